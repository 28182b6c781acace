//! Full page reload companions.
//!
//! Watching files is not this crate's job. Each watch group is handed to a
//! [`FullReloadFactory`] and the resulting handle is returned alongside the
//! main plugin, tagged with the group it was created from.

use combo_config::{RefreshConfig, ResolvedPluginConfig};
use serde_json::Value;
use tracing::debug;

/// Creates one full-reload watcher per watch group.
pub trait FullReloadFactory {
    type Handle;

    fn create(&self, paths: &[String], config: Option<&Value>) -> Self::Handle;
}

impl<F, H> FullReloadFactory for F
where
    F: Fn(&[String], Option<&Value>) -> H,
{
    type Handle = H;

    fn create(&self, paths: &[String], config: Option<&Value>) -> H {
        self(paths, config)
    }
}

/// A factory whose handles are the watch groups themselves.
///
/// Useful when the caller only needs to know what would be watched.
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchGroups;

impl FullReloadFactory for WatchGroups {
    type Handle = RefreshConfig;

    fn create(&self, paths: &[String], config: Option<&Value>) -> RefreshConfig {
        RefreshConfig {
            paths: paths.to_vec(),
            config: config.cloned(),
        }
    }
}

/// A watcher handle and the group it watches.
#[derive(Debug, Clone)]
pub struct FullReload<H> {
    pub handle: H,
    pub group: RefreshConfig,
}

/// Create a watcher for every configured group, in order.
pub fn resolve_full_reload<F>(config: &ResolvedPluginConfig, factory: &F) -> Vec<FullReload<F::Handle>>
where
    F: FullReloadFactory + ?Sized,
{
    config
        .refresh
        .iter()
        .map(|group| {
            debug!(paths = ?group.paths, "creating full reload watcher");
            FullReload {
                handle: factory.create(&group.paths, group.config.as_ref()),
                group: group.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_config::{PluginOptions, normalize};
    use serde_json::json;

    #[test]
    fn closures_are_factories() {
        let config = normalize(Some(
            PluginOptions::new("a.js").with_refresh(vec![
                RefreshConfig::new(["a/**"]).with_config(json!({"delay": 987})),
                RefreshConfig::new(["b/**"]),
            ]),
        ))
        .unwrap();

        let factory = |paths: &[String], config: Option<&Value>| (paths.len(), config.is_some());
        let reloads = resolve_full_reload(&config, &factory);

        assert_eq!(reloads.len(), 2);
        assert_eq!(reloads[0].handle, (1, true));
        assert_eq!(reloads[1].handle, (1, false));
        assert_eq!(reloads[1].group.paths, vec!["b/**"]);
    }

    #[test]
    fn watch_groups_echo_the_group() {
        let config = normalize(Some(PluginOptions::new("a.js").with_refresh("views/**"))).unwrap();
        let reloads = resolve_full_reload(&config, &WatchGroups);
        assert_eq!(reloads[0].handle, reloads[0].group);
    }
}

//! Bundler plugin for the Combo web framework.
//!
//! [`combo`] builds the main [`ComboPlugin`] plus one full-reload companion
//! per configured watch group:
//!
//! ```no_run
//! use combo_plugin::{WatchGroups, combo};
//! use combo_config::PluginOptions;
//!
//! let plugins = combo(
//!     PluginOptions::new("js/app.js").with_refresh("lib/**/*.heex"),
//!     WatchGroups,
//! )
//! .unwrap();
//! assert_eq!(plugins.len(), 2);
//! ```

pub mod error;
pub mod full_reload;
pub mod middleware;
pub mod plugin;
pub mod session;

pub use error::{PluginError, Result};
pub use full_reload::{FullReload, FullReloadFactory, WatchGroups, resolve_full_reload};
pub use middleware::{DEV_SERVER_INDEX_HTML, dev_server_index};
pub use plugin::{ComboPlugin, Enforce, PLUGIN_NAME};
pub use session::PluginSession;

/// The main plugin followed by its full-reload companions.
#[derive(Debug)]
pub struct ComboPlugins<H> {
    pub plugin: ComboPlugin,
    pub full_reload: Vec<FullReload<H>>,
}

impl<H> ComboPlugins<H> {
    /// Number of plugins handed to the host.
    pub fn len(&self) -> usize {
        1 + self.full_reload.len()
    }

    /// Never true: the main plugin is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Split into the plugin and its full-reload handles.
    pub fn into_parts(self) -> (ComboPlugin, Vec<FullReload<H>>) {
        (self.plugin, self.full_reload)
    }
}

/// Normalize `options` and create the plugin list.
///
/// # Errors
///
/// Fails when the options do not normalize.
pub fn combo<F>(options: impl Into<Option<combo_config::PluginOptions>>, factory: F) -> Result<ComboPlugins<F::Handle>>
where
    F: FullReloadFactory,
{
    let plugin = ComboPlugin::new(options)?;
    let full_reload = resolve_full_reload(plugin.plugin_config(), &factory);

    Ok(ComboPlugins {
        plugin,
        full_reload,
    })
}

//! The main plugin and its host hooks.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum::Router;
use combo_config::{
    Command, ConfigEnv, DEV_SERVER_ORIGIN_PLACEHOLDER, DevServerUrl, EnvSource, MergedBuildConfig,
    PluginOptions, ProcessEnv, ResolvedConfig, ResolvedPluginConfig, UserConfig, merge, normalize,
    resolve_dev_server_url,
};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{PluginError, Result};
use crate::middleware::dev_server_index;
use crate::session::PluginSession;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "combo";

/// When the host runs this plugin relative to its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforce {
    Pre,
    Post,
}

/// The Combo plugin.
///
/// Options are normalized once at construction. Everything the host hands
/// over later (the user config, the resolved config, the dev server URL) is
/// kept behind locks so the plugin can be shared across threads.
#[derive(Debug)]
pub struct ComboPlugin {
    config: ResolvedPluginConfig,
    env_source: Arc<dyn EnvSource>,
    session: Arc<PluginSession>,
    user_config: RwLock<Option<UserConfig>>,
    resolved: RwLock<Option<ResolvedConfig>>,
    dev_server_url: OnceLock<DevServerUrl>,
}

impl ComboPlugin {
    /// # Errors
    ///
    /// Fails when the options do not normalize.
    pub fn new(options: impl Into<Option<PluginOptions>>) -> Result<Self> {
        Ok(Self::from_config(normalize(options.into())?))
    }

    /// Wrap an already normalized configuration.
    pub fn from_config(config: ResolvedPluginConfig) -> Self {
        Self {
            config,
            env_source: Arc::new(ProcessEnv),
            session: PluginSession::global(),
            user_config: RwLock::new(None),
            resolved: RwLock::new(None),
            dev_server_url: OnceLock::new(),
        }
    }

    /// Replace the process environment as the source of `ASSET_URL` and friends.
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Arc::new(source);
        self
    }

    /// Use a private session instead of the process-wide one.
    pub fn with_session(mut self, session: Arc<PluginSession>) -> Self {
        self.session = session;
        self
    }

    /// The plugin name reported to the host.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Always [`Enforce::Post`].
    pub fn enforce(&self) -> Enforce {
        Enforce::Post
    }

    /// The normalized plugin options.
    pub fn plugin_config(&self) -> &ResolvedPluginConfig {
        &self.config
    }

    /// The session holding this plugin's hot files.
    pub fn session(&self) -> &Arc<PluginSession> {
        &self.session
    }

    /// The `config` hook: compute the configuration for this invocation.
    ///
    /// The environment is loaded from the user's `envDir`, or the working
    /// directory when unset.
    pub fn config(&self, user: &UserConfig, env: &ConfigEnv) -> Result<MergedBuildConfig> {
        let env_dir = user.env_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let vars = self.env_source.load(&env.mode, &env_dir);

        let merged = merge(&self.config, user, env, &vars)?;
        *self.user_config.write() = Some(user.clone());

        Ok(merged)
    }

    /// Record the host's final configuration for the listening hook and `transform`.
    pub fn config_resolved(&self, resolved: ResolvedConfig) {
        debug!(command = ?resolved.command, base = %resolved.base, "configuration resolved");
        *self.resolved.write() = Some(resolved);
    }

    /// Substitute the dev server URL into served modules.
    ///
    /// Returns `None` (leave the module alone) for builds and before the dev
    /// server is listening.
    pub fn transform(&self, code: &str, id: &str) -> Option<String> {
        let serving = self
            .resolved
            .read()
            .as_ref()
            .is_some_and(|resolved| resolved.command == Command::Serve);
        if !serving {
            return None;
        }

        let Some(url) = self.dev_server_url.get() else {
            debug!(id, "dev server URL not known yet; module left untouched");
            return None;
        };

        let code = code.replace(DEV_SERVER_ORIGIN_PLACEHOLDER, url.as_str());
        Some(self.config.transform_on_serve.apply(code, url))
    }

    /// Install the hot-file cleanup handlers and the dev-server middleware.
    pub fn configure_server<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.session.install_exit_handlers();
        router.layer(axum::middleware::from_fn(dev_server_index))
    }

    /// Record the dev server URL and write the hot file.
    ///
    /// Only the first call has an effect; later calls return the same URL.
    ///
    /// # Errors
    ///
    /// `NotResolved` before `config_resolved`; `HotFile` when the hot file
    /// cannot be written.
    pub fn on_listening(&self, address: SocketAddr) -> Result<DevServerUrl> {
        if let Some(url) = self.dev_server_url.get() {
            return Ok(url.clone());
        }

        let resolved = self.resolved.read().clone().ok_or(PluginError::NotResolved)?;
        let user_origin = self
            .user_config
            .read()
            .as_ref()
            .and_then(|user| user.server.as_ref())
            .and_then(|server| server.origin.clone());

        let url = match user_origin {
            Some(origin) => DevServerUrl::from_origin(origin),
            None => resolve_dev_server_url(address, &resolved.server),
        };

        let base = resolved.base.strip_suffix('/').unwrap_or(&resolved.base);
        let hot_file = self.config.hot_file_path();
        self.session
            .write_hot_file(Path::new(&hot_file), &format!("{url}{base}"))?;

        info!(%url, hot_file = %hot_file, "dev server listening");
        Ok(self.dev_server_url.get_or_init(|| url).clone())
    }

    /// The dev-server URL, once the server is listening.
    pub fn dev_server_url(&self) -> Option<&DevServerUrl> {
        self.dev_server_url.get()
    }

    /// Remove the hot file when the host shuts the dev server down.
    ///
    /// Plugins on the global session (the default) must be closed, or the
    /// process must end through a watched signal or stdin closing; a plain
    /// return from `main` skips static destructors and leaves the hot file
    /// behind. A private session set through [`Self::with_session`] also
    /// cleans up when its last plugin is dropped.
    pub fn close(&self) {
        self.session.clean();
    }
}

impl TryFrom<PluginOptions> for ComboPlugin {
    type Error = PluginError;

    fn try_from(options: PluginOptions) -> Result<Self> {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_config::Env;

    fn plugin() -> ComboPlugin {
        ComboPlugin::new(PluginOptions::new("js/app.js"))
            .unwrap()
            .with_env_source(Env::new())
            .with_session(Arc::new(PluginSession::new().with_stdin_watch(false)))
    }

    #[test]
    fn identifies_itself() {
        let plugin = plugin();
        assert_eq!(plugin.name(), "combo");
        assert_eq!(plugin.enforce(), Enforce::Post);
    }

    #[test]
    fn missing_options_fail_construction() {
        let err = ComboPlugin::new(None::<PluginOptions>).unwrap_err();
        assert_eq!(err.to_string(), "vite-plugin-combo: missing configuration.");
    }

    #[test]
    fn transform_is_a_no_op_for_builds() {
        let plugin = plugin();
        plugin.config_resolved(ResolvedConfig::new(Command::Build));
        assert_eq!(plugin.transform(DEV_SERVER_ORIGIN_PLACEHOLDER, "app.js"), None);
    }

    #[test]
    fn on_listening_requires_resolved_config() {
        let plugin = plugin();
        let err = plugin.on_listening("127.0.0.1:5173".parse().unwrap()).unwrap_err();
        assert!(matches!(err, PluginError::NotResolved));
    }
}

//! Configuration core of the Combo bundler plugin.
//!
//! Everything here is pure apart from the environment-driven certificate
//! checks and config-file discovery:
//!
//! - [`normalize`] turns [`PluginOptions`] into a [`ResolvedPluginConfig`]
//! - [`merge`] computes the host configuration for one `config` call
//! - [`resolve_dev_server_url`] derives the dev server's public URL

pub mod cors;
pub mod dev_server;
pub mod discovery;
pub mod env;
pub mod error;
pub mod host;
pub mod merge;
pub mod normalize;
pub mod options;
pub mod refresh;

pub use cors::{CorsOptions, CorsOrigin, OriginMatcher, default_allowed_origins};
pub use dev_server::{DEV_SERVER_ORIGIN_PLACEHOLDER, DevServerUrl, Scheme, resolve_dev_server_url};
pub use discovery::{ConfigDiscovery, discover};
pub use env::{Env, EnvServerConfig, EnvSource, ProcessEnv, resolve_server_config_from_env};
pub use error::{ConfigError, Result};
pub use host::{
    Alias, AliasOptions, BoolOr, BuildOptions, Command, ConfigEnv, HmrOptions, HttpsOptions,
    NoExternal, ResolveOptions, ResolvedConfig, RollupOptions, ServerOptions, SsrOptions,
    UserConfig,
};
pub use merge::{MergedBuildConfig, merge};
pub use normalize::{ResolvedPluginConfig, normalize};
pub use options::{InputOption, PluginOptions, RefreshConfig, RefreshOption, TransformOnServe};
pub use refresh::{default_refresh_paths, resolve_watch_groups};

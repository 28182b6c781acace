//! The host build tool's configuration surface.
//!
//! Only the fields the plugin reads or contributes to are modeled. Every field
//! of [`UserConfig`] is optional: `None` means "the user did not set it" and is
//! the only case in which the plugin contributes a value.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cors::CorsOptions;
use crate::options::InputOption;

/// The command the host build tool is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Build,
    Serve,
}

/// Second argument of the `config` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnv {
    pub command: Command,
    pub mode: String,
}

impl ConfigEnv {
    /// Environment for a `build` in `mode`.
    pub fn build(mode: impl Into<String>) -> Self {
        Self {
            command: Command::Build,
            mode: mode.into(),
        }
    }

    /// Environment for a `serve` in `mode`.
    pub fn serve(mode: impl Into<String>) -> Self {
        Self {
            command: Command::Serve,
            mode: mode.into(),
        }
    }
}

/// A boolean or a value, e.g. `manifest: false | "manifest.json"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolOr<T> {
    Bool(bool),
    Value(T),
}

impl<T> BoolOr<T> {
    /// JavaScript truthiness: `false` is off, any value is on.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Bool(enabled) => *enabled,
            Self::Value(_) => true,
        }
    }

    /// The payload, if this is not a bare boolean.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Bool(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<&str> for BoolOr<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

/// The user's partial configuration, as seen by the `config` hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<BoolOr<String>>,

    /// Directory the host loads `.env` files from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResolveOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr: Option<SsrOptions>,
}

impl UserConfig {
    /// Whether this configuration drives an SSR build.
    pub fn is_ssr(&self) -> bool {
        self.build
            .as_ref()
            .and_then(|build| build.ssr.as_ref())
            .is_some_and(BoolOr::is_enabled)
    }

    /// The `server` section, if present.
    pub fn server(&self) -> Option<&ServerOptions> {
        self.server.as_ref()
    }

    /// Shorthand for an SSR build configuration.
    pub fn ssr_build() -> Self {
        Self {
            build: Some(BuildOptions {
                ssr: Some(BoolOr::Bool(true)),
                ..BuildOptions::default()
            }),
            ..Self::default()
        }
    }
}

/// The host's `build` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// `true` or the SSR entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr: Option<BoolOr<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<BoolOr<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssr_manifest: Option<BoolOr<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup_options: Option<RollupOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_inline_limit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_out_dir: Option<bool>,
}

/// Bundler input options under `build.rollupOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputOption>,
}

/// The host's `server` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<BoolOr<CorsOptions>>,

    /// `true` listens on all addresses, a string names the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<BoolOr<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmr: Option<BoolOr<HmrOptions>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<HttpsOptions>,
}

/// Hot module replacement client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HmrOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl HmrOptions {
    /// Fields set on `self` win over `base`.
    pub fn over(self, base: HmrOptions) -> HmrOptions {
        HmrOptions {
            protocol: self.protocol.or(base.protocol),
            host: self.host.or(base.host),
            port: self.port.or(base.port),
            client_port: self.client_port.or(base.client_port),
            path: self.path.or(base.path),
        }
    }
}

/// TLS material for the dev server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<u8>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<Vec<u8>>,
}

/// The host's `resolve` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<AliasOptions>,
}

/// Module aliases in either of the host's two accepted forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasOptions {
    /// First match wins.
    List(Vec<Alias>),
    Map(IndexMap<String, String>),
}

/// One entry of an alias list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub find: String,
    pub replacement: String,
}

impl Alias {
    /// Alias `find` to `replacement`.
    pub fn new(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replacement: replacement.into(),
        }
    }
}

/// The host's `ssr` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SsrOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_external: Option<NoExternal>,
}

/// Dependencies bundled into the SSR output instead of left external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoExternal {
    /// `true` bundles every dependency.
    All(bool),
    One(String),
    Many(Vec<String>),
}

/// The host's final configuration, handed to `config_resolved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub command: Command,

    #[serde(default)]
    pub mode: String,

    #[serde(default)]
    pub base: String,

    #[serde(default)]
    pub server: ServerOptions,
}

impl ResolvedConfig {
    /// A resolved configuration for `command` with empty mode and base.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            mode: String::new(),
            base: String::new(),
            server: ServerOptions::default(),
        }
    }

    /// Set the public base path.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Set the resolved server options.
    pub fn with_server(mut self, server: ServerOptions) -> Self {
        self.server = server;
        self
    }
}

//! User-facing plugin options.
//!
//! `PluginOptions` is what a project hands to the plugin. Every field except
//! `input` is optional; [`crate::normalize`] fills in the defaults.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dev_server::DevServerUrl;

/// Entry points handed to the bundler.
///
/// The shape is passed through untouched, the bundler accepts all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputOption {
    Single(String),
    Multiple(Vec<String>),
    Named(IndexMap<String, String>),
}

impl From<&str> for InputOption {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for InputOption {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for InputOption {
    fn from(value: Vec<String>) -> Self {
        Self::Multiple(value)
    }
}

impl<const N: usize> From<[&str; N]> for InputOption {
    fn from(value: [&str; N]) -> Self {
        Self::Multiple(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<IndexMap<String, String>> for InputOption {
    fn from(value: IndexMap<String, String>) -> Self {
        Self::Named(value)
    }
}

/// A group of watched globs whose changes trigger a full page reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub paths: Vec<String>,

    /// Options forwarded verbatim to the full-reload watcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl RefreshConfig {
    /// A watch group for `paths` with no extra options.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            config: None,
        }
    }

    /// Attach options passed through to the watcher.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// Every shape accepted for the `refresh` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefreshOption {
    /// `false` disables full reload, `true` watches the default paths.
    Enabled(bool),
    Path(String),
    Paths(Vec<String>),
    Group(RefreshConfig),
    Groups(Vec<RefreshConfig>),
}

impl From<bool> for RefreshOption {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}

impl From<&str> for RefreshOption {
    fn from(value: &str) -> Self {
        Self::Path(value.to_string())
    }
}

impl From<Vec<String>> for RefreshOption {
    fn from(value: Vec<String>) -> Self {
        Self::Paths(value)
    }
}

impl<const N: usize> From<[&str; N]> for RefreshOption {
    fn from(value: [&str; N]) -> Self {
        Self::Paths(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<RefreshConfig> for RefreshOption {
    fn from(value: RefreshConfig) -> Self {
        Self::Group(value)
    }
}

impl From<Vec<RefreshConfig>> for RefreshOption {
    fn from(value: Vec<RefreshConfig>) -> Self {
        Self::Groups(value)
    }
}

type TransformFn = dyn Fn(String, &DevServerUrl) -> String + Send + Sync;

/// Code transform applied to every module while serving.
#[derive(Clone)]
pub struct TransformOnServe(Arc<TransformFn>);

impl TransformOnServe {
    /// Wrap a function of the code and the dev-server URL.
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(String, &DevServerUrl) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(transform))
    }

    /// A transform returning the code unchanged.
    pub fn identity() -> Self {
        Self::new(|code, _| code)
    }

    /// Run the transform.
    pub fn apply(&self, code: String, url: &DevServerUrl) -> String {
        (self.0)(code, url)
    }
}

impl Default for TransformOnServe {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for TransformOnServe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformOnServe(..)")
    }
}

/// Two transforms are equal only when they are the same closure.
impl PartialEq for TransformOnServe {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Options supplied by the project.
///
/// Keys are camelCase so the struct can be read from the same shape the
/// JavaScript plugin accepts; snake_case aliases let environment overrides
/// (`COMBO_STATIC_DIR`) land on the same fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// The path or paths of the entries.
    #[serde(default)]
    pub input: Option<InputOption>,

    /// Combo's public static directory. Defaults to `../priv/static`.
    #[serde(default, alias = "static_dir")]
    pub static_dir: Option<String>,

    /// Subdirectory of `static_dir` receiving the CSR bundles. Defaults to `build`.
    #[serde(default, alias = "build_dir")]
    pub build_dir: Option<String>,

    /// The path or paths of the SSR entries. Defaults to `input`.
    #[serde(default, alias = "ssr_input")]
    pub ssr_input: Option<InputOption>,

    /// Directory receiving the SSR bundles. Defaults to `../priv/ssr`.
    #[serde(default, alias = "ssr_out_dir")]
    pub ssr_out_dir: Option<String>,

    /// File name of the hot file, placed inside `static_dir`. Defaults to `__hot__`.
    #[serde(default, alias = "hot_file")]
    pub hot_file: Option<String>,

    #[serde(default)]
    pub refresh: Option<RefreshOption>,

    #[serde(skip)]
    pub transform_on_serve: Option<TransformOnServe>,
}

impl PluginOptions {
    /// Options with `input` and every other field defaulted.
    pub fn new(input: impl Into<InputOption>) -> Self {
        Self {
            input: Some(input.into()),
            ..Self::default()
        }
    }

    /// Set `staticDir`.
    pub fn with_static_dir(mut self, dir: impl Into<String>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Set `buildDir`.
    pub fn with_build_dir(mut self, dir: impl Into<String>) -> Self {
        self.build_dir = Some(dir.into());
        self
    }

    /// Set `ssrInput`.
    pub fn with_ssr_input(mut self, input: impl Into<InputOption>) -> Self {
        self.ssr_input = Some(input.into());
        self
    }

    /// Set `ssrOutDir`.
    pub fn with_ssr_out_dir(mut self, dir: impl Into<String>) -> Self {
        self.ssr_out_dir = Some(dir.into());
        self
    }

    /// Set the hot file name.
    pub fn with_hot_file(mut self, name: impl Into<String>) -> Self {
        self.hot_file = Some(name.into());
        self
    }

    /// Set the refresh watch groups.
    pub fn with_refresh(mut self, refresh: impl Into<RefreshOption>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    /// Transform served code after the dev-server URL is substituted.
    pub fn with_transform_on_serve<F>(mut self, transform: F) -> Self
    where
        F: Fn(String, &DevServerUrl) -> String + Send + Sync + 'static,
    {
        self.transform_on_serve = Some(TransformOnServe::new(transform));
        self
    }

    /// Create from serde_json::Value (for programmatic config)
    ///
    /// `null` is the "no configuration at all" case and maps to `None`.
    pub fn from_value(value: Value) -> crate::Result<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| crate::ConfigError::InvalidValue {
                field: "options".to_string(),
                message: e.to_string(),
            })
    }
}

/// Shorthand: bare entry points configure both the CSR and the SSR input.
impl From<InputOption> for PluginOptions {
    fn from(input: InputOption) -> Self {
        Self {
            input: Some(input.clone()),
            ssr_input: Some(input),
            ..Self::default()
        }
    }
}

impl From<&str> for PluginOptions {
    fn from(input: &str) -> Self {
        InputOption::from(input).into()
    }
}

impl From<Vec<String>> for PluginOptions {
    fn from(input: Vec<String>) -> Self {
        InputOption::from(input).into()
    }
}

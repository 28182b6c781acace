//! Option normalization: validate user options and fill in defaults.

use std::path::Path;

use path_clean::PathClean;
use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::options::{InputOption, PluginOptions, RefreshConfig, RefreshOption, TransformOnServe};
use crate::refresh::resolve_watch_groups;

/// Directory served as static assets, relative to the bundler root.
pub const DEFAULT_STATIC_DIR: &str = "../priv/static";
/// Subdirectory of the static directory for client builds.
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Output directory of SSR builds.
pub const DEFAULT_SSR_OUT_DIR: &str = "../priv/ssr";
/// File name of the hot file in the static directory.
pub const DEFAULT_HOT_FILE: &str = "__hot__";

/// Plugin options with every default applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPluginConfig {
    pub input: InputOption,
    pub static_dir: String,
    pub build_dir: String,
    pub ssr_input: InputOption,
    pub ssr_out_dir: String,
    /// Hot file name, relative to `static_dir`.
    pub hot_file: String,
    /// Full-reload watch groups in canonical form.
    pub refresh: Vec<RefreshConfig>,
    #[serde(skip)]
    pub transform_on_serve: TransformOnServe,
}

impl ResolvedPluginConfig {
    /// Location of the hot file the framework reads.
    pub fn hot_file_path(&self) -> String {
        join_path(&self.static_dir, &self.hot_file)
    }
}

impl TryFrom<PluginOptions> for ResolvedPluginConfig {
    type Error = ConfigError;

    fn try_from(options: PluginOptions) -> Result<Self> {
        normalize(Some(options))
    }
}

impl From<ResolvedPluginConfig> for PluginOptions {
    fn from(config: ResolvedPluginConfig) -> Self {
        Self {
            input: Some(config.input),
            static_dir: Some(config.static_dir),
            build_dir: Some(config.build_dir),
            ssr_input: Some(config.ssr_input),
            ssr_out_dir: Some(config.ssr_out_dir),
            hot_file: Some(config.hot_file),
            refresh: Some(RefreshOption::Groups(config.refresh)),
            transform_on_serve: Some(config.transform_on_serve),
        }
    }
}

/// Convert the user's options into a complete configuration.
///
/// # Errors
///
/// - `MissingConfiguration` when no options were supplied
/// - `MissingInput` when `input` is absent
/// - `NotADirectory` when an explicit `static_dir` or `build_dir` trims down to nothing
pub fn normalize(options: Option<PluginOptions>) -> Result<ResolvedPluginConfig> {
    let options = options.ok_or(ConfigError::MissingConfiguration)?;
    let input = options.input.ok_or(ConfigError::MissingInput)?;

    let static_dir = match options.static_dir.as_deref().map(trim_dir) {
        Some(dir) if dir.is_empty() => {
            return Err(ConfigError::not_a_directory("staticDir", DEFAULT_STATIC_DIR));
        }
        Some(dir) => dir,
        None => DEFAULT_STATIC_DIR.to_string(),
    };

    let build_dir = match options.build_dir.as_deref().map(trim_dir) {
        Some(dir) if dir.is_empty() => {
            return Err(ConfigError::not_a_directory("buildDir", DEFAULT_BUILD_DIR));
        }
        Some(dir) => dir,
        None => DEFAULT_BUILD_DIR.to_string(),
    };

    // An empty ssrOutDir is accepted as-is.
    let ssr_out_dir = options
        .ssr_out_dir
        .as_deref()
        .map(trim_dir)
        .unwrap_or_else(|| DEFAULT_SSR_OUT_DIR.to_string());

    Ok(ResolvedPluginConfig {
        ssr_input: options.ssr_input.unwrap_or_else(|| input.clone()),
        input,
        static_dir,
        build_dir,
        ssr_out_dir,
        hot_file: options
            .hot_file
            .unwrap_or_else(|| DEFAULT_HOT_FILE.to_string()),
        refresh: resolve_watch_groups(options.refresh.as_ref()),
        transform_on_serve: options.transform_on_serve.unwrap_or_default(),
    })
}

/// Strip surrounding whitespace, then leading and trailing `/`.
///
/// Backslashes are kept, so a UNC-style `\\host\share` survives intact.
pub fn trim_dir(dir: &str) -> String {
    dir.trim().trim_matches('/').to_string()
}

/// Join two path segments with exactly one separator, keeping `..` prefixes.
pub fn join_path(base: &str, segment: &str) -> String {
    Path::new(base)
        .join(segment.trim_start_matches('/'))
        .clean()
        .to_string_lossy()
        .into_owned()
}

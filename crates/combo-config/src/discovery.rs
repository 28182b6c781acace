//! File-based option discovery for CLI use.
//!
//! Library users construct [`PluginOptions`] directly; the `combo` binary
//! reads them from the project instead.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json, Toml};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::options::PluginOptions;

/// Dedicated configuration file.
pub const CONFIG_FILE: &str = "combo.toml";
/// Manifest whose `combo` field holds the options.
pub const PACKAGE_JSON: &str = "package.json";
/// Field of `package.json` holding the options.
pub const PACKAGE_FIELD: &str = "combo";
/// Prefix of environment variables overriding discovered options.
pub const ENV_PREFIX: &str = "COMBO_";

/// Searches a project root for plugin options.
///
/// # Example
///
/// ```no_run
/// use combo_config::ConfigDiscovery;
///
/// let options = ConfigDiscovery::new(".").load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Discover configuration in `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory being searched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the options file in the root directory.
    ///
    /// Searches in this order:
    /// 1. `combo.toml`
    /// 2. `package.json` with a non-null `combo` field
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.is_file() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join(PACKAGE_JSON);
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;

        parsed
            .get(PACKAGE_FIELD)
            .is_some_and(|field| !field.is_null())
            .then_some(pkg_path)
    }

    /// Load options from the discovered file, with `COMBO_*` variables on top.
    ///
    /// # Errors
    ///
    /// `NotFound` when the root holds no options file; `Extract` when the
    /// file or the environment does not describe valid options.
    pub fn load(&self) -> Result<PluginOptions> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.clone()))?;
        debug!(path = %path.display(), "loading plugin options");

        let file_options = self.load_from(&path)?;
        let env_options: PluginOptions = Figment::from(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;

        Ok(overlay(file_options, env_options))
    }

    fn load_from(&self, path: &Path) -> Result<PluginOptions> {
        let figment = if path.file_name() == Some(std::ffi::OsStr::new(PACKAGE_JSON)) {
            Figment::from(Json::file(path)).focus(PACKAGE_FIELD)
        } else {
            Figment::from(Toml::file(path))
        };

        Ok(figment.extract().map_err(Box::new)?)
    }
}

/// Fields set in `top` replace those of `base`.
fn overlay(base: PluginOptions, top: PluginOptions) -> PluginOptions {
    PluginOptions {
        input: top.input.or(base.input),
        static_dir: top.static_dir.or(base.static_dir),
        build_dir: top.build_dir.or(base.build_dir),
        ssr_input: top.ssr_input.or(base.ssr_input),
        ssr_out_dir: top.ssr_out_dir.or(base.ssr_out_dir),
        hot_file: top.hot_file.or(base.hot_file),
        refresh: top.refresh.or(base.refresh),
        transform_on_serve: top.transform_on_serve.or(base.transform_on_serve),
    }
}

/// Discover and load options from the current directory.
pub fn discover() -> Result<PluginOptions> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(root).load()
}

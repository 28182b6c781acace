//! Errors surfaced to the host from plugin hooks.

use std::path::PathBuf;

use combo_config::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

/// Result alias for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors raised by the plugin hooks.
#[derive(Debug, Error, Diagnostic)]
pub enum PluginError {
    /// Option normalization or configuration merging failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The hot file or its directory could not be written.
    #[error("failed to write hot file {}: {source}", path.display())]
    #[diagnostic(
        code(combo::plugin::hot_file),
        help("Check that the static directory is writable")
    )]
    HotFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dev-server hook ran before `config_resolved`.
    #[error("the dev server started before the configuration was resolved")]
    #[diagnostic(code(combo::plugin::not_resolved))]
    NotResolved,
}

impl PluginError {
    pub(crate) fn hot_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::HotFile {
            path: path.into(),
            source,
        }
    }
}

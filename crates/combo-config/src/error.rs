//! Error types for option normalization, discovery and configuration merging.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading, normalizing or merging configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    // Normalization errors
    #[error("vite-plugin-combo: missing configuration.")]
    #[diagnostic(
        code(combo::config::missing),
        help("Pass at least the entry points, e.g. `PluginOptions::new(\"js/app.js\")`")
    )]
    MissingConfiguration,

    #[error("vite-plugin-combo: missing configuration for \"input\".")]
    #[diagnostic(
        code(combo::config::missing_input),
        help("Set `input` to an entry path, a list of paths or a name-to-path mapping")
    )]
    MissingInput,

    #[error("vite-plugin-combo: {option} must be a directory. E.g. '{example}'.")]
    #[diagnostic(code(combo::config::not_a_directory))]
    NotADirectory {
        option: &'static str,
        example: &'static str,
    },

    // Environment errors (serve mode)
    #[error(
        "Unable to find the certificate files specified in your environment. Ensure you have correctly configured VITE_DEV_SERVER_KEY: [{key}] and VITE_DEV_SERVER_CERT: [{cert}]."
    )]
    #[diagnostic(code(combo::env::certificate_not_found))]
    CertificateNotFound { key: String, cert: String },

    #[error("Unable to determine the host from the environment's APP_URL: [{app_url}].")]
    #[diagnostic(
        code(combo::env::unresolvable_host),
        help("APP_URL must be an absolute URL such as https://my-app.test")
    )]
    UnresolvableHost { app_url: String },

    // Discovery errors
    #[error("no combo configuration found in {}", .0.display())]
    #[diagnostic(
        code(combo::config::not_found),
        help("Create a combo.toml or add a \"combo\" field to package.json")
    )]
    NotFound(PathBuf),

    #[error("invalid config value in {field}: {message}")]
    #[diagnostic(code(combo::config::invalid_value))]
    InvalidValue { field: String, message: String },

    #[error("failed to extract plugin options: {0}")]
    #[diagnostic(code(combo::config::extract))]
    Extract(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    #[diagnostic(code(combo::io))]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn not_a_directory(option: &'static str, example: &'static str) -> Self {
        Self::NotADirectory { option, example }
    }
}

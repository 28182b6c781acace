//! Environment lookup and the dev-server settings derived from it.
//!
//! Loading `.env` files is the host's business. The plugin only sees a
//! key-value lookup, supplied through [`EnvSource`].

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::host::{HmrOptions, HttpsOptions};

/// Prefix for the built `base` URL.
pub const ASSET_URL: &str = "ASSET_URL";
/// The application's own URL: extra CORS origin and TLS host.
pub const APP_URL: &str = "APP_URL";
/// Path of the TLS key for the dev server.
pub const DEV_SERVER_KEY: &str = "VITE_DEV_SERVER_KEY";
/// Path of the TLS certificate for the dev server.
pub const DEV_SERVER_CERT: &str = "VITE_DEV_SERVER_CERT";

/// A snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(IndexMap<String, String>);

impl Env {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Add or replace `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a variable; empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Supplies the environment for a `config` call.
pub trait EnvSource: Debug + Send + Sync {
    fn load(&self, mode: &str, env_dir: &Path) -> Env;
}

/// Reads the process environment, ignoring mode and directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn load(&self, _mode: &str, _env_dir: &Path) -> Env {
        Env::from_process()
    }
}

/// A fixed environment, handy for embedding and tests.
impl EnvSource for Env {
    fn load(&self, _mode: &str, _env_dir: &Path) -> Env {
        self.clone()
    }
}

/// Dev-server settings derived from `VITE_DEV_SERVER_KEY`/`VITE_DEV_SERVER_CERT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvServerConfig {
    pub host: String,
    pub hmr: HmrOptions,
    pub https: HttpsOptions,
}

/// Upgrade the dev server to HTTPS when certificate paths are configured.
///
/// Returns `Ok(None)` when neither variable is set.
///
/// # Errors
///
/// - `CertificateNotFound` when either file does not exist
/// - `UnresolvableHost` when `APP_URL` is missing or not an absolute URL
pub fn resolve_server_config_from_env(env: &Env) -> Result<Option<EnvServerConfig>> {
    let key = env.get(DEV_SERVER_KEY);
    let cert = env.get(DEV_SERVER_CERT);

    if key.is_none() && cert.is_none() {
        debug!("no dev server certificate configured");
        return Ok(None);
    }

    let (Some(key_path), Some(cert_path)) = (existing_file(key), existing_file(cert)) else {
        return Err(ConfigError::CertificateNotFound {
            key: key.unwrap_or_default().to_string(),
            cert: cert.unwrap_or_default().to_string(),
        });
    };

    let host = resolve_host_from_env(env).ok_or_else(|| ConfigError::UnresolvableHost {
        app_url: env.get(APP_URL).unwrap_or_default().to_string(),
    })?;

    debug!(%host, key = %key_path.display(), cert = %cert_path.display(), "serving over https");

    Ok(Some(EnvServerConfig {
        hmr: HmrOptions {
            host: Some(host.clone()),
            ..HmrOptions::default()
        },
        host,
        https: HttpsOptions {
            key: Some(fs::read(&key_path)?),
            cert: Some(fs::read(&cert_path)?),
        },
    }))
}

fn existing_file(path: Option<&str>) -> Option<PathBuf> {
    path.map(PathBuf::from).filter(|path| path.exists())
}

/// `host[:port]` of `APP_URL`; the port is omitted when it is the scheme default.
fn resolve_host_from_env(env: &Env) -> Option<String> {
    let url = Url::parse(env.get(APP_URL)?).ok()?;
    let host = url.host_str()?;

    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let env = Env::new().with(ASSET_URL, "");
        assert_eq!(env.get(ASSET_URL), None);
    }

    #[test]
    fn host_keeps_non_default_port() {
        let env = Env::new().with(APP_URL, "https://my-app.test:8443/path");
        assert_eq!(resolve_host_from_env(&env).as_deref(), Some("my-app.test:8443"));

        let env = Env::new().with(APP_URL, "https://my-app.test");
        assert_eq!(resolve_host_from_env(&env).as_deref(), Some("my-app.test"));

        let env = Env::new().with(APP_URL, "not a url");
        assert_eq!(resolve_host_from_env(&env), None);
    }

    #[test]
    fn no_certificates_means_no_server_config() {
        let env = Env::new().with(APP_URL, "https://my-app.test");
        assert_eq!(resolve_server_config_from_env(&env).unwrap(), None);
    }
}

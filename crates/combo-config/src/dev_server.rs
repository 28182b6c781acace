//! The dev server's externally reachable URL.

use std::fmt;
use std::net::SocketAddr;

use serde::Serialize;

use crate::host::{BoolOr, ServerOptions};

/// Written into `server.origin` until the real URL is known.
///
/// Served modules get it replaced with the [`DevServerUrl`].
pub const DEV_SERVER_ORIGIN_PLACEHOLDER: &str = "http://__vite_dev_server_host_placeholder__";

/// URL scheme of the dev server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The scheme without `://`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `scheme://host:port` of the running dev server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DevServerUrl(String);

impl DevServerUrl {
    /// Build a URL from its parts. IPv6 hosts must already be bracketed.
    pub fn new(scheme: Scheme, host: &str, port: u16) -> Self {
        Self(format!("{scheme}://{host}:{port}"))
    }

    /// Use an origin configured by the user verbatim.
    pub fn from_origin(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DevServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DevServerUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the dev server URL from the bound address and the server config.
///
/// HMR client settings take precedence: they describe what the browser
/// actually connects to, which may be a proxy in front of the dev server.
pub fn resolve_dev_server_url(address: SocketAddr, server: &ServerOptions) -> DevServerUrl {
    let hmr = server.hmr.as_ref().and_then(BoolOr::value);

    let scheme = match hmr.and_then(|hmr| hmr.protocol.as_deref()) {
        Some("wss") => Scheme::Https,
        Some(_) => Scheme::Http,
        None if server.https.is_some() => Scheme::Https,
        None => Scheme::Http,
    };

    let host = hmr
        .and_then(|hmr| hmr.host.clone())
        .or_else(|| server.host.as_ref().and_then(BoolOr::value).cloned())
        .unwrap_or_else(|| match address {
            SocketAddr::V4(v4) => v4.ip().to_string(),
            SocketAddr::V6(v6) => format!("[{}]", v6.ip()),
        });

    let port = hmr
        .and_then(|hmr| hmr.client_port)
        .unwrap_or_else(|| address.port());

    DevServerUrl::new(scheme, &host, port)
}

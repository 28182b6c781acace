//! Dev-server CORS allow-list.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Origins the host dev server allows out of the box: `localhost`,
/// `*.localhost`, `127.0.0.1` and `[::1]`, on any port.
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    r"^https?://(?:(?:[^:]+\.)?localhost|127\.0\.0\.1|\[::1\])(?::\d+)?$";

/// `*.test` domains, a common convention for local development.
pub const TEST_DOMAIN_ORIGINS: &str = r"^https?://.*\.test(:\d+)?$";

static DEFAULT_ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_ALLOWED_ORIGINS).expect("default origin pattern is valid"));

static TEST_DOMAINS: Lazy<Regex> =
    Lazy::new(|| Regex::new(TEST_DOMAIN_ORIGINS).expect("test domain pattern is valid"));

/// A literal origin or a pattern an origin must match.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "OriginRepr", into = "OriginRepr")]
pub enum OriginMatcher {
    Literal(String),
    Pattern(Regex),
}

impl OriginMatcher {
    /// Match `origin` exactly.
    pub fn literal(origin: impl Into<String>) -> Self {
        Self::Literal(origin.into())
    }

    /// Match origins against a regular expression.
    ///
    /// # Errors
    ///
    /// When `pattern` is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Whether `origin` is accepted.
    pub fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == origin,
            Self::Pattern(pattern) => pattern.is_match(origin),
        }
    }
}

impl fmt::Debug for OriginMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
        }
    }
}

impl PartialEq for OriginMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Wire form: a plain string is a literal, `{ "pattern": ... }` a regex.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OriginRepr {
    Literal(String),
    Pattern { pattern: String },
}

impl TryFrom<OriginRepr> for OriginMatcher {
    type Error = regex::Error;

    fn try_from(repr: OriginRepr) -> Result<Self, Self::Error> {
        match repr {
            OriginRepr::Literal(literal) => Ok(Self::Literal(literal)),
            OriginRepr::Pattern { pattern } => Self::pattern(&pattern),
        }
    }
}

impl From<OriginMatcher> for OriginRepr {
    fn from(matcher: OriginMatcher) -> Self {
        match matcher {
            OriginMatcher::Literal(literal) => Self::Literal(literal),
            OriginMatcher::Pattern(pattern) => Self::Pattern {
                pattern: pattern.as_str().to_string(),
            },
        }
    }
}

/// The `origin` field of the CORS options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// `true` reflects any origin, `false` disables CORS.
    Any(bool),
    One(OriginMatcher),
    List(Vec<OriginMatcher>),
}

impl CorsOrigin {
    /// Whether any configured origin accepts `origin`.
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any(allowed) => *allowed,
            Self::One(matcher) => matcher.matches(origin),
            Self::List(matchers) => matchers.iter().any(|m| m.matches(origin)),
        }
    }
}

/// The host's CORS options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<CorsOrigin>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<bool>,
}

impl CorsOptions {
    /// CORS options allowing `origin`.
    pub fn with_origin(origin: CorsOrigin) -> Self {
        Self {
            origin: Some(origin),
            ..Self::default()
        }
    }

    /// Whether a request from `origin` passes this policy.
    pub fn allows(&self, origin: &str) -> bool {
        self.origin.as_ref().is_some_and(|o| o.allows(origin))
    }
}

/// The plugin's allow-list: the host defaults, `*.test` domains and `APP_URL`.
pub fn default_allowed_origins(app_url: Option<&str>) -> Vec<OriginMatcher> {
    let mut origins = vec![
        OriginMatcher::Pattern(DEFAULT_ALLOWED.clone()),
        OriginMatcher::Pattern(TEST_DOMAINS.clone()),
    ];

    if let Some(app_url) = app_url.filter(|url| !url.is_empty()) {
        origins.push(OriginMatcher::literal(app_url));
    }

    origins
}

//! Resolve a page component from a map of available pages.
//!
//! Pages are keyed by path. A page is either already loaded or loaded on
//! demand by an async loader, mirroring eager and lazy module globs.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

/// Failure to resolve a page.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PageError {
    #[error("Page not found: {}", .0.join(","))]
    #[diagnostic(code(combo::page::not_found))]
    NotFound(Vec<String>),
}

type Loader<T> = Box<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>;

/// A page that is loaded, or a loader producing it.
pub enum PageEntry<T> {
    Ready(T),
    Lazy(Loader<T>),
}

impl<T> PageEntry<T> {
    /// A page that is already loaded.
    pub fn ready(page: T) -> Self {
        Self::Ready(page)
    }

    /// A page produced on demand by `loader`.
    pub fn lazy<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::Lazy(Box::new(move || loader().boxed()))
    }

    /// Load the page, running the loader for lazy entries.
    pub async fn load(&self) -> T
    where
        T: Clone,
    {
        match self {
            Self::Ready(page) => page.clone(),
            Self::Lazy(loader) => loader().await,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PageEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(page) => f.debug_tuple("Ready").field(page).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Paths to try, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates(Vec<String>);

impl Candidates {
    /// Candidate paths in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Candidates {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for Candidates {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<Vec<String>> for Candidates {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<&[&str]> for Candidates {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Candidates {
    fn from(paths: [&str; N]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

/// Load the first candidate present in `pages`.
///
/// # Errors
///
/// `NotFound` listing every candidate when none is present.
pub async fn resolve_page_component<T: Clone>(
    candidates: impl Into<Candidates>,
    pages: &IndexMap<String, PageEntry<T>>,
) -> Result<T, PageError> {
    let candidates = candidates.into();

    for path in candidates.iter() {
        if let Some(page) = pages.get(path) {
            debug!(path, "page resolved");
            return Ok(page.load().await);
        }
    }

    Err(PageError::NotFound(candidates.0))
}

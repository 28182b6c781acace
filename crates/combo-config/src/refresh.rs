//! Full-reload watch group resolution.

use std::path::Path;

use tracing::debug;

use crate::options::{RefreshConfig, RefreshOption};

/// Paths watched when `refresh` is `true`, kept only if they exist.
pub const DEFAULT_REFRESH_PATHS: &[&str] = &[
    "app/Livewire/**",
    "app/View/Components/**",
    "lang/**",
    "resources/lang/**",
    "resources/views/**",
    "routes/**",
];

/// The default refresh paths whose directory exists below `root`.
pub fn default_refresh_paths(root: &Path) -> Vec<String> {
    DEFAULT_REFRESH_PATHS
        .iter()
        .filter(|path| root.join(path.trim_end_matches("**")).exists())
        .map(|path| path.to_string())
        .collect()
}

/// Fold every accepted `refresh` shape into an ordered list of watch groups.
///
/// An empty result means full reload is disabled.
pub fn resolve_watch_groups(refresh: Option<&RefreshOption>) -> Vec<RefreshConfig> {
    let Some(refresh) = refresh else {
        return Vec::new();
    };

    match refresh {
        RefreshOption::Enabled(false) => Vec::new(),
        RefreshOption::Enabled(true) => {
            let paths = default_refresh_paths(Path::new("."));
            debug!(?paths, "refresh enabled with default paths");
            vec![RefreshConfig::new(paths)]
        }
        RefreshOption::Path(path) => vec![RefreshConfig::new([path.clone()])],
        RefreshOption::Paths(paths) if paths.is_empty() => Vec::new(),
        RefreshOption::Paths(paths) => vec![RefreshConfig::new(paths.iter().cloned())],
        RefreshOption::Group(group) => vec![group.clone()],
        RefreshOption::Groups(groups) => groups.clone(),
    }
}

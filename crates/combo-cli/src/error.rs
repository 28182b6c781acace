//! Rendering command errors.

use combo_config::ConfigError;
use combo_plugin::PluginError;
use miette::Report;

/// Keep the diagnostic (code and help) of configuration errors; everything
/// else is rendered with its context chain.
pub fn to_report(err: anyhow::Error) -> Report {
    let err = match err.downcast::<PluginError>() {
        Ok(err) => return Report::new(err),
        Err(err) => err,
    };

    match err.downcast::<ConfigError>() {
        Ok(err) => Report::new(err),
        Err(err) => miette::miette!("{err:#}"),
    }
}

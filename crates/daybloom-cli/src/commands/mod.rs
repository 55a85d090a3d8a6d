pub mod config;
pub mod demo;
pub mod run;
pub mod streak;

use daybloom_core::{Clock, Config, Workspace};

/// Workspace on the local zone, built from the user's config.
///
/// A broken config file is reported and replaced by defaults.
pub(crate) fn workspace(clock: Clock) -> Workspace {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("{e}; using default configuration");
        Config::default()
    });
    Workspace::new(config, clock)
}

//! Run configuration shared by the engine and the pipeline.
//!
//! A `RunConfig` is built once at startup (from CLI flags or the `[run]`
//! table of a TOML file) and passed down by value. Nothing mutates it after
//! the first verification runs.

use serde::{Deserialize, Serialize};

/// Process-level flags that modulate whether verification executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Dry run: the engine performs no remote work and every verification
    /// is reported as skipped.
    pub testing: bool,
    /// Read by the CLI (log level) and by delivery collaborators.
    pub verbose: bool,
    /// Install even when pre-checks report the package as present.
    pub force: bool,
}

impl RunConfig {
    /// A configuration with `testing` set, for dry runs.
    pub fn dry_run() -> Self {
        Self {
            testing: true,
            ..Self::default()
        }
    }
}

//! Verification outcomes and journal records.
//!
//! `Outcome` is what the engine returns for a successful invocation.
//! `VerificationRecord` is what gets written to the journal, one per
//! invocation, whatever the outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::host::{HostGroup, Phase};

/// Unique identifier for one deployment run.
///
/// Every record the engine journals during a run carries the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    /// Create a new, unique run ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Terminal state of a single verification invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Testing mode: nothing was dispatched.
    Skipped,
    /// Every command exited zero on every host.
    Passed,
    /// The delivery collaborator reported failure (or could not run).
    Failed,
}

/// An immutable record of one verification invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// The run this invocation belongs to.
    pub run_id: RunId,
    /// The spec's description.
    pub description: String,
    /// The host group the commands were dispatched to.
    pub hosts: HostGroup,
    pub phase: Phase,
    /// The full command batch, in spec order.
    pub commands: Vec<String>,
    pub outcome: Outcome,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}

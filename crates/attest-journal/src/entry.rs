//! Journal entry and log types.
//!
//! `JournalEntry` wraps one `VerificationRecord` with its position in the
//! chain and the SHA-256 hashes that make tampering detectable.
//! `JournalLog` is the exported snapshot of a journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use attest_contracts::record::{Outcome, VerificationRecord};

/// A single link in the hash chain.
///
/// Changing any field, including those of the embedded record, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The verification invocation this entry records.
    pub record: VerificationRecord,

    /// Hash (hex) of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hash (hex) over (sequence, prev_hash, canonical JSON of record).
    pub this_hash: String,
}

impl JournalEntry {
    /// The `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Counts of journaled outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub skipped: usize,
    pub passed: usize,
    pub failed: usize,
}

impl OutcomeSummary {
    pub(crate) fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// An exported snapshot of a journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLog {
    /// All entries in chain order.
    pub entries: Vec<JournalEntry>,

    pub summary: OutcomeSummary,

    /// Wall-clock time (UTC) of the export.
    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty if the log is empty.
    pub terminal_hash: String,
}

//! In-memory implementation of `Journal`.
//!
//! Entries live in a `Vec` behind a `Mutex`, so the journal can be shared by
//! reference with any number of engines. Use `export()` once the run is done
//! and `verify_integrity()` to confirm the chain is intact.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    record::VerificationRecord,
};
use attest_core::traits::Journal;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::{JournalEntry, JournalLog, OutcomeSummary},
};

pub(crate) struct JournalState {
    pub(crate) entries: Vec<JournalEntry>,
    /// `this_hash` of the last entry, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

/// An append-only, hash-chained journal held in memory.
pub struct InMemoryJournal {
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(JournalState {
                entries: Vec::new(),
                last_hash: JournalEntry::GENESIS_HASH.to_string(),
            })),
        }
    }

    // Readers only clone or hash the entries, so a poisoned lock still holds
    // a consistent chain.
    fn read(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Snapshot every entry written so far.
    pub fn export(&self) -> JournalLog {
        let state = self.read();
        let mut summary = OutcomeSummary::default();
        for entry in &state.entries {
            summary.add(entry.record.outcome);
        }

        JournalLog {
            entries: state.entries.clone(),
            summary,
            exported_at: Utc::now(),
            terminal_hash: state
                .entries
                .last()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Confirm that no stored entry has been altered.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().entries)
    }
}

impl Default for InMemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal for InMemoryJournal {
    fn record(&self, record: &VerificationRecord) -> AttestResult<()> {
        let mut state = self.state.lock().map_err(|e| AttestError::JournalWriteFailed {
            reason: format!("journal state lock poisoned: {e}"),
        })?;

        let sequence = state.entries.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(sequence, record, &prev_hash)?;

        debug!(
            sequence,
            description = %record.description,
            outcome = ?record.outcome,
            "journaled verification"
        );

        state.entries.push(JournalEntry {
            sequence,
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }
}

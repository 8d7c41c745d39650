//! # attest-journal
//!
//! Append-only, SHA-256 hash-chained journal of verification invocations.
//!
//! Every record the engine writes is wrapped in a `JournalEntry` linked to
//! the previous entry by hash. Editing any stored entry breaks the chain,
//! which `verify_chain` detects.
//!
//! ```rust,ignore
//! use attest_journal::InMemoryJournal;
//!
//! let journal = InMemoryJournal::new();
//! let engine = VerificationEngine::new(&delivery, config).with_journal(&journal);
//! engine.process(&spec, &hosts, Phase::Post)?;
//!
//! assert!(journal.verify_integrity());
//! let log = journal.export();
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use entry::{JournalEntry, JournalLog, OutcomeSummary};
pub use memory::InMemoryJournal;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use attest_contracts::{
        host::{HostGroup, Phase},
        record::{Outcome, RunId, VerificationRecord},
    };
    use attest_core::traits::Journal;

    use super::{verify_chain, InMemoryJournal, JournalEntry, OutcomeSummary};

    fn make_record(description: &str, outcome: Outcome) -> VerificationRecord {
        VerificationRecord {
            run_id: RunId::new(),
            description: description.to_string(),
            hosts: HostGroup::new(["web"]),
            phase: Phase::Post,
            commands: vec!["test -f /etc/nginx/nginx.conf".to_string()],
            outcome,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_hash_chain_integrity() {
        let journal = InMemoryJournal::new();
        journal.record(&make_record("first", Outcome::Passed)).unwrap();
        journal.record(&make_record("second", Outcome::Failed)).unwrap();
        journal.record(&make_record("third", Outcome::Skipped)).unwrap();

        assert!(journal.verify_integrity(), "chain must be valid after sequential writes");
        assert_eq!(journal.len(), 3);
    }

    /// Rewriting a failed outcome as passed is detected.
    #[test]
    fn test_tamper_detection() {
        let journal = InMemoryJournal::new();
        journal.record(&make_record("nginx", Outcome::Failed)).unwrap();
        journal.record(&make_record("redis", Outcome::Passed)).unwrap();

        {
            let mut state = journal.state.lock().unwrap();
            state.entries[0].record.outcome = Outcome::Passed;
        }

        assert!(!journal.verify_integrity(), "chain must detect an edited entry");
    }

    #[test]
    fn test_genesis_and_linkage() {
        let journal = InMemoryJournal::new();
        journal.record(&make_record("a", Outcome::Passed)).unwrap();
        journal.record(&make_record("b", Outcome::Passed)).unwrap();

        let log = journal.export();
        assert_eq!(log.entries[0].prev_hash, JournalEntry::GENESIS_HASH);
        assert_eq!(log.entries[1].prev_hash, log.entries[0].this_hash);
        assert_eq!(log.entries[1].sequence, 1);
    }

    #[test]
    fn test_export_summarizes_outcomes() {
        let journal = InMemoryJournal::new();
        journal.record(&make_record("a", Outcome::Passed)).unwrap();
        journal.record(&make_record("b", Outcome::Passed)).unwrap();
        journal.record(&make_record("c", Outcome::Failed)).unwrap();
        journal.record(&make_record("d", Outcome::Skipped)).unwrap();

        let log = journal.export();
        assert_eq!(
            log.summary,
            OutcomeSummary { skipped: 1, passed: 2, failed: 1 }
        );
        assert_eq!(log.terminal_hash, log.entries.last().unwrap().this_hash);
        assert!(verify_chain(&log.entries));
    }

    /// Dropping an entry from the middle breaks the sequence.
    #[test]
    fn test_removed_entry_is_detected() {
        let journal = InMemoryJournal::new();
        journal.record(&make_record("a", Outcome::Passed)).unwrap();
        journal.record(&make_record("b", Outcome::Passed)).unwrap();
        journal.record(&make_record("c", Outcome::Passed)).unwrap();

        let mut entries = journal.export().entries;
        entries.remove(1);
        assert!(!verify_chain(&entries));
    }

    #[test]
    fn test_empty_journal() {
        let journal = InMemoryJournal::new();
        assert!(journal.is_empty());
        assert!(journal.verify_integrity());
        assert!(journal.export().terminal_hash.is_empty());
        assert!(verify_chain(&[]));
    }
}

//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. canonical JSON of the record (serde_json, no pretty-printing)

use sha2::{Digest, Sha256};

use attest_contracts::{
    error::{AttestError, AttestResult},
    record::VerificationRecord,
};

use crate::entry::JournalEntry;

/// Compute the SHA-256 hash of one journal entry as lowercase hex.
pub fn hash_entry(sequence: u64, record: &VerificationRecord, prev_hash: &str) -> AttestResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| AttestError::JournalWriteFailed {
        reason: format!("record is not serializable: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Check prev-hash linkage and recompute every hash.
///
/// Returns `false` at the first mismatch. An empty chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    let mut expected_prev = JournalEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        match hash_entry(entry.sequence, &entry.record, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}

//! The verification engine: dispatches a spec to a host group and turns the
//! aggregate result into an outcome or a halt.
//!
//! Per invocation:
//!
//!   Constructed → { Skipped (testing) | Dispatched } → { Passed | Failed → halt }
//!
//! There is no retry transition. One `process` call makes at most one
//! delivery call; the collaborator's single boolean is the whole verdict.
//! The engine does not report which command or which host failed.

use chrono::Utc;
use tracing::{debug, info, warn};

use attest_contracts::{
    config::RunConfig,
    error::{AttestError, AttestResult},
    host::{HostGroup, Phase},
    record::{Outcome, RunId, VerificationRecord},
};

use crate::{
    spec::VerificationSpec,
    traits::{Delivery, Journal},
};

/// Runs verification specs through a borrowed delivery collaborator.
///
/// Construct one engine per deployment run. The run configuration is fixed
/// at construction; the engine never mutates it.
pub struct VerificationEngine<'a> {
    delivery: &'a dyn Delivery,
    journal: Option<&'a dyn Journal>,
    config: RunConfig,
    run_id: RunId,
}

impl<'a> VerificationEngine<'a> {
    /// Create an engine that dispatches through `delivery`.
    pub fn new(delivery: &'a dyn Delivery, config: RunConfig) -> Self {
        Self {
            delivery,
            journal: None,
            config,
            run_id: RunId::new(),
        }
    }

    /// Record every invocation in `journal`.
    pub fn with_journal(mut self, journal: &'a dyn Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Tag journal records with `run_id` instead of a fresh one.
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Verify `spec` against every host in `hosts`.
    ///
    /// # Pipeline
    ///
    /// 1. `testing` set → journal `Skipped`, return without contacting the
    ///    delivery collaborator
    /// 2. Log the progress line (`Verifying <description>...`)
    /// 3. Hand the full command batch to `delivery.process()` with
    ///    `privileged = true`
    /// 4. `Ok(true)` → journal `Passed`, return `Outcome::Passed`
    /// 5. `Ok(false)` or `Err` → journal `Failed`, return
    ///    `AttestError::VerificationFailed` carrying the spec's description
    ///
    /// `phase` is only used for logging and the journal.
    ///
    /// # Errors
    ///
    /// `VerificationFailed` is the halt signal; callers must not retry it at
    /// this layer. `JournalWriteFailed` is returned if the record cannot be
    /// written.
    pub fn process(
        &self,
        spec: &VerificationSpec,
        hosts: &HostGroup,
        phase: Phase,
    ) -> AttestResult<Outcome> {
        if self.config.testing {
            info!(
                description = %spec.description(),
                hosts = %hosts,
                phase = %phase,
                "skipping verification (testing)"
            );
            self.journal(spec, hosts, phase, Outcome::Skipped)?;
            return Ok(Outcome::Skipped);
        }

        let indent = " ".repeat(spec.options().indent);
        info!(
            hosts = %hosts,
            phase = %phase,
            command_count = spec.commands().len(),
            "{indent}Verifying {}...",
            spec.description()
        );
        debug!(
            description = %spec.description(),
            commands = %spec.commands().join("; "),
            "dispatching verification commands"
        );

        let passed = match self.delivery.process(spec.commands(), hosts, true) {
            Ok(passed) => passed,
            Err(e) => {
                warn!(
                    description = %spec.description(),
                    hosts = %hosts,
                    error = %e,
                    "delivery could not run verification commands"
                );
                false
            }
        };

        if passed {
            debug!(description = %spec.description(), hosts = %hosts, "verification passed");
            self.journal(spec, hosts, phase, Outcome::Passed)?;
            return Ok(Outcome::Passed);
        }

        warn!(
            description = %spec.description(),
            hosts = %hosts,
            phase = %phase,
            "verification failed"
        );
        // A lost record replaces the halt, so it must still name the spec.
        self.journal(spec, hosts, phase, Outcome::Failed)
            .map_err(|e| match e {
                AttestError::JournalWriteFailed { reason } => AttestError::JournalWriteFailed {
                    reason: format!(
                        "{reason} (while recording failed verification '{}')",
                        spec.description()
                    ),
                },
                other => other,
            })?;
        Err(AttestError::VerificationFailed {
            description: spec.description().to_string(),
        })
    }

    fn journal(
        &self,
        spec: &VerificationSpec,
        hosts: &HostGroup,
        phase: Phase,
        outcome: Outcome,
    ) -> AttestResult<()> {
        let Some(journal) = self.journal else {
            return Ok(());
        };
        journal.record(&VerificationRecord {
            run_id: self.run_id,
            description: spec.description().to_string(),
            hosts: hosts.clone(),
            phase,
            commands: spec.commands().to_vec(),
            outcome,
            timestamp: Utc::now(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

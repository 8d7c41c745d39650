//! Error types for the attest verification pipeline.
//!
//! All fallible operations return `AttestResult<T>`. Construction errors
//! surface while a spec is being declared and never reach execution;
//! `VerificationFailed` is the halt signal raised by the engine.

use thiserror::Error;

/// The unified error type for attest.
#[derive(Debug, Error)]
pub enum AttestError {
    /// A verification was declared without a builder block.
    #[error("verify requires a builder block")]
    MissingBuilder,

    /// A verification was declared with a blank description.
    #[error("verify requires a non-empty description")]
    EmptyDescription,

    /// A builder block called a predicate no registered module provides.
    #[error("unknown predicate '{predicate}'")]
    UnknownPredicate { predicate: String },

    /// A predicate was called with arguments it cannot compile.
    #[error("invalid arguments for predicate '{predicate}': {reason}")]
    InvalidArguments { predicate: String, reason: String },

    /// Two modules tried to contribute the same predicate name.
    #[error("predicate '{predicate}' from module '{module}' collides with module '{existing_module}'")]
    PredicateCollision {
        predicate: String,
        existing_module: String,
        module: String,
    },

    /// The same module was registered twice.
    #[error("predicate module '{module}' is already registered")]
    ModuleAlreadyRegistered { module: String },

    /// The aggregated remote check failed. This is the halt signal: it is
    /// never retried by the engine and aborts the deployment run.
    #[error("verification failed: {description}")]
    VerificationFailed { description: String },

    /// A delivery collaborator could not run the command batch at all.
    #[error("delivery failed: {reason}")]
    DeliveryFailed { reason: String },

    /// An installer step failed.
    #[error("install of '{package}' failed: {reason}")]
    InstallFailed { package: String, reason: String },

    /// The journal could not persist a verification record.
    ///
    /// Treated as fatal, the same as an unrecorded verification.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },

    /// A configuration file or manifest is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl AttestError {
    /// True for the halt signal raised when a spec's predicates do not all pass.
    pub fn is_halt(&self) -> bool {
        matches!(self, AttestError::VerificationFailed { .. })
    }

    /// True for errors raised while declaring a spec, before any execution.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            AttestError::MissingBuilder
                | AttestError::EmptyDescription
                | AttestError::UnknownPredicate { .. }
                | AttestError::InvalidArguments { .. }
        )
    }
}

/// Convenience alias used throughout the attest crates.
pub type AttestResult<T> = Result<T, AttestError>;

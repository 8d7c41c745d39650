//! Collaborator traits at the edges of the verification engine.
//!
//! - `Delivery`: transports command batches to hosts and reports one
//!   aggregate pass/fail
//! - `Journal`: records every verification invocation
//! - `Installer`: the install step the pipeline runs between pre- and
//!   post-checks
//!
//! The engine borrows these; their lifetimes belong to the surrounding
//! deployment pipeline.

use attest_contracts::{
    error::AttestResult,
    host::HostGroup,
    record::VerificationRecord,
};

/// The component that physically runs predicate commands on target hosts.
///
/// Implementations decide how hosts are reached, whether they are checked
/// sequentially or in parallel, and how connections are retried.
pub trait Delivery: Send + Sync {
    /// Run every command in `commands` on every host in `hosts`.
    ///
    /// Return `Ok(true)` only if all commands exited zero on all hosts.
    /// Every command must be attempted; implementations must not stop at the
    /// first failure. `privileged` asks for the commands to run with elevated
    /// rights (e.g. through sudo).
    ///
    /// `Err` means the batch could not be run at all. The engine treats that
    /// the same as `Ok(false)`.
    fn process(&self, commands: &[String], hosts: &HostGroup, privileged: bool) -> AttestResult<bool>;
}

/// An append-only sink for verification records.
pub trait Journal: Send + Sync {
    /// Append one record. A failed write is fatal for the invocation.
    fn record(&self, record: &VerificationRecord) -> AttestResult<()>;
}

/// Applies a package's installation steps to a host group.
pub trait Installer {
    /// Install `package` on `hosts`.
    fn install(&self, package: &str, hosts: &HostGroup) -> AttestResult<()>;
}

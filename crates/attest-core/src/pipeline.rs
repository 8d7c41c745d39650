//! The package pipeline: pre-check, install, post-check.
//!
//! This is the part of a deployment run that consumes the halt signal. A
//! pre-check halt only means "not installed yet" and is caught; a post-check
//! halt aborts the run.

use tracing::{debug, info};

use attest_contracts::{
    error::AttestResult,
    host::{HostGroup, Phase},
    record::Outcome,
};

use crate::{
    engine::VerificationEngine,
    spec::VerificationSpec,
    traits::Installer,
};

/// A package together with the verifications that prove it is installed.
#[derive(Debug, Clone)]
pub struct VerifiedPackage {
    pub name: String,
    /// Where the package is installed and verified.
    pub hosts: HostGroup,
    pub verifications: Vec<VerificationSpec>,
}

impl VerifiedPackage {
    pub fn new(name: impl Into<String>, hosts: HostGroup) -> Self {
        Self {
            name: name.into(),
            hosts,
            verifications: Vec::new(),
        }
    }

    /// Add a verification to the package.
    pub fn verify(mut self, spec: VerificationSpec) -> Self {
        self.verifications.push(spec);
        self
    }
}

/// What the pipeline did with a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageReport {
    /// Every pre-check passed; the installer was not invoked.
    AlreadySatisfied { package: String },
    /// The installer ran and no post-check halted.
    Installed {
        package: String,
        /// Post-checks that actually passed (skipped ones are not counted).
        verified: usize,
    },
}

/// Drives packages through the verification engine and an installer.
pub struct Pipeline<'a> {
    engine: VerificationEngine<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(engine: VerificationEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &VerificationEngine<'a> {
        &self.engine
    }

    /// Process one package.
    ///
    /// 1. Unless `force` is set or the package has no verifications, run
    ///    every verification as a pre-check. If all of them pass, report
    ///    `AlreadySatisfied` and stop. A halt here is swallowed.
    /// 2. Run the installer.
    /// 3. Run every verification as a post-check. The first halt propagates.
    ///
    /// # Errors
    ///
    /// Post-check `VerificationFailed`, installer errors, and any non-halt
    /// error raised during pre-checks.
    pub fn run(&self, package: &VerifiedPackage, installer: &dyn Installer) -> AttestResult<PackageReport> {
        if !package.verifications.is_empty() && !self.engine.config().force {
            match self.verify_all(package, Phase::Pre) {
                Ok(outcomes) if outcomes.iter().all(|o| *o == Outcome::Passed) => {
                    info!(
                        package = %package.name,
                        hosts = %package.hosts,
                        "--> already installed"
                    );
                    return Ok(PackageReport::AlreadySatisfied {
                        package: package.name.clone(),
                    });
                }
                Ok(_) => {}
                Err(e) if e.is_halt() => {
                    debug!(package = %package.name, error = %e, "pre-check failed, installing");
                }
                Err(e) => return Err(e),
            }
        }

        installer.install(&package.name, &package.hosts)?;

        let outcomes = self.verify_all(package, Phase::Post)?;
        let verified = outcomes.iter().filter(|o| **o == Outcome::Passed).count();
        Ok(PackageReport::Installed {
            package: package.name.clone(),
            verified,
        })
    }

    /// Process packages in order, stopping at the first error.
    pub fn run_all(
        &self,
        packages: &[VerifiedPackage],
        installer: &dyn Installer,
    ) -> AttestResult<Vec<PackageReport>> {
        packages.iter().map(|p| self.run(p, installer)).collect()
    }

    fn verify_all(&self, package: &VerifiedPackage, phase: Phase) -> AttestResult<Vec<Outcome>> {
        package
            .verifications
            .iter()
            .map(|spec| self.engine.process(spec, &package.hosts, phase))
            .collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

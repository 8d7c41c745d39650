//! Loading and compiling manifests.
//!
//! `Manifest` parses a TOML document and compiles each `[[verify]]` entry
//! into a `VerificationSpec` through a sealed predicate set. Parse and IO
//! failures are `ConfigError`; compile failures are the usual construction
//! errors (`MissingBuilder`, `UnknownPredicate`, `InvalidArguments`).

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use attest_contracts::{
    config::RunConfig,
    error::{AttestError, AttestResult},
    host::HostGroup,
};
use attest_core::{Predicates, SpecBuilder, VerificationSpec};

use crate::entry::{ManifestFile, VerifyEntry};

/// A compiled `[[verify]]` entry: what to check and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledVerification {
    pub spec: VerificationSpec,
    pub hosts: HostGroup,
}

/// A parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    file: ManifestFile,
}

impl Manifest {
    /// Parse `s` as a TOML manifest.
    pub fn from_toml_str(s: &str) -> AttestResult<Self> {
        let file: ManifestFile = toml::from_str(s).map_err(|e| AttestError::ConfigError {
            reason: format!("failed to parse manifest TOML: {}", e),
        })?;
        Ok(Self { file })
    }

    /// Read the file at `path` and parse it as a TOML manifest.
    pub fn from_file(path: &Path) -> AttestResult<Self> {
        let contents = read(path)?;
        Self::from_toml_str(&contents)
    }

    /// The `[run]` table, or defaults when absent.
    pub fn run_config(&self) -> RunConfig {
        self.file.run
    }

    pub fn entries(&self) -> &[VerifyEntry] {
        &self.file.verify
    }

    /// Compile every entry, in order, stopping at the first error.
    pub fn compile(&self, predicates: &Predicates) -> AttestResult<Vec<CompiledVerification>> {
        self.file
            .verify
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                compile_entry(predicates, entry).inspect_err(|e| {
                    warn!(
                        entry = index,
                        description = %entry.description,
                        error = %e,
                        "manifest entry does not compile"
                    );
                })
            })
            .collect()
    }
}

fn compile_entry(predicates: &Predicates, entry: &VerifyEntry) -> AttestResult<CompiledVerification> {
    let block = entry.has_block().then_some(|b: &mut SpecBuilder<'_>| {
        if let Some(indent) = entry.indent {
            b.indent(indent);
        }
        for call in entry.checks.iter().flatten() {
            let args: Vec<&str> = call.args.iter().map(String::as_str).collect();
            b.check(&call.predicate, &args);
        }
        for command in entry.commands.iter().flatten() {
            b.command(command.as_str());
        }
    });

    let spec = VerificationSpec::define(predicates, entry.description.as_str(), block)?;
    debug!(
        description = %spec.description(),
        command_count = spec.commands().len(),
        "compiled manifest entry"
    );

    Ok(CompiledVerification {
        spec,
        hosts: HostGroup::new(entry.hosts.iter().cloned()),
    })
}

/// Read only the `[run]` table of the TOML file at `path`.
///
/// Other tables are ignored, so the same file can be a full manifest.
pub fn load_run_config(path: &Path) -> AttestResult<RunConfig> {
    #[derive(Deserialize)]
    struct RunOnly {
        #[serde(default)]
        run: RunConfig,
    }

    let contents = read(path)?;
    let parsed: RunOnly = toml::from_str(&contents).map_err(|e| AttestError::ConfigError {
        reason: format!("failed to parse run configuration: {}", e),
    })?;
    Ok(parsed.run)
}

fn read(path: &Path) -> AttestResult<String> {
    std::fs::read_to_string(path).map_err(|e| AttestError::ConfigError {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })
}

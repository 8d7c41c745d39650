//! # attest-manifest
//!
//! TOML-driven verification manifests and run configuration for attest.
//!
//! ## Overview
//!
//! A manifest declares `[[verify]]` entries: a description, a host group,
//! and the predicate calls that make up the entry's builder block. Entries
//! are compiled in declaration order against a sealed predicate set, so a
//! typo in a predicate name fails at load time rather than on a host.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use attest_manifest::Manifest;
//!
//! let manifest = Manifest::from_file(Path::new("verify.toml"))?;
//! let predicates = attest_predicates::standard()?.seal();
//! for compiled in manifest.compile(&predicates)? {
//!     engine.process(&compiled.spec, &compiled.hosts, Phase::Post)?;
//! }
//! ```

pub mod entry;
pub mod manifest;

pub use entry::{CheckCall, ManifestFile, VerifyEntry};
pub use manifest::{load_run_config, CompiledVerification, Manifest};

// ── Tests ─────────────────────────────────────────────────────────────────────

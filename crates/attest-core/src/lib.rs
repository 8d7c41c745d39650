//! # attest-core
//!
//! The verification engine for attest.
//!
//! This crate provides:
//! - The collaborator traits (`Delivery`, `Journal`, `Installer`)
//! - The predicate registry and its sealed, read-only view
//! - `VerificationSpec` and the `SpecBuilder` its builder block runs against
//! - `VerificationEngine`, which dispatches a spec to a host group and turns
//!   the aggregate result into an outcome or a halt
//! - `Pipeline`, which runs pre-checks, an installer, and post-checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attest_core::{VerificationEngine, VerificationSpec};
//!
//! let predicates = attest_predicates::standard()?.seal();
//! let spec = VerificationSpec::build(&predicates, "nginx config", |b| {
//!     b.check("has_file", &["/etc/nginx/nginx.conf"]);
//! })?;
//! let engine = VerificationEngine::new(&delivery, config);
//! engine.process(&spec, &HostGroup::new(["web"]), Phase::Post)?;
//! ```

pub mod engine;
pub mod pipeline;
pub mod registry;
pub mod spec;
pub mod traits;

pub use engine::VerificationEngine;
pub use pipeline::{PackageReport, Pipeline, VerifiedPackage};
pub use registry::{predicate, PredicateFn, PredicateModule, PredicateRegistry, Predicates};
pub use spec::{SpecBuilder, SpecOptions, VerificationSpec};

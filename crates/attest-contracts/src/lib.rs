//! # attest-contracts
//!
//! Shared types, run configuration, and error contracts for attest.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate: only data definitions and error types.

pub mod config;
pub mod error;
pub mod host;
pub mod record;

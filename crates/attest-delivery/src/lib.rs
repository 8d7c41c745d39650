//! # attest-delivery
//!
//! Reference implementations of [`attest_core::traits::Delivery`].
//!
//! - [`LocalShellDelivery`] runs predicate commands through `sh -c` on the
//!   machine attest runs on.
//! - [`ScriptedDelivery`] answers from a script and records every call, for
//!   rehearsing manifests and for tests.
//!
//! Remote transports (SSH and friends) plug in through the same trait.

pub mod local;
pub mod scripted;

pub use local::{LocalShellDelivery, HOST_ENV};
pub use scripted::{DeliveryCall, Reply, ScriptedDelivery};

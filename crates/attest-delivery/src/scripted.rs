//! Scripted in-memory delivery.
//!
//! Records every call and answers from a script instead of touching any
//! host. Used to rehearse manifests (`attest check --assume pass`) and as a
//! test double for pipeline code.
//!
//! Answer order for each call:
//!   1. any command in the batch was marked failing → `Ok(false)`
//!   2. the next queued reply, if any
//!   3. the default reply

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    host::HostGroup,
};
use attest_core::traits::Delivery;

/// What a scripted delivery answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Pass,
    Fail,
    /// Behave like a transport that could not run the batch.
    Error(String),
}

impl Reply {
    fn into_result(self) -> AttestResult<bool> {
        match self {
            Reply::Pass => Ok(true),
            Reply::Fail => Ok(false),
            Reply::Error(reason) => Err(AttestError::DeliveryFailed { reason }),
        }
    }
}

/// One recorded delivery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCall {
    pub commands: Vec<String>,
    pub hosts: HostGroup,
    pub privileged: bool,
}

/// A delivery collaborator that answers from a script.
#[derive(Debug)]
pub struct ScriptedDelivery {
    default: Reply,
    queued: Mutex<VecDeque<Reply>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<DeliveryCall>>,
}

impl ScriptedDelivery {
    /// Answer every call with `default`.
    pub fn new(default: Reply) -> Self {
        Self {
            default,
            queued: Mutex::new(VecDeque::new()),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn passing() -> Self {
        Self::new(Reply::Pass)
    }

    pub fn failing() -> Self {
        Self::new(Reply::Fail)
    }

    /// Answer the next calls with `replies`, in order, before falling back
    /// to the default.
    pub fn then(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        lock(&self.queued).extend(replies);
        self
    }

    /// Fail any batch that contains `command`.
    pub fn fail_on(mut self, command: impl Into<String>) -> Self {
        self.failing.insert(command.into());
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<DeliveryCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

// Recorded state stays consistent even if a test thread panicked holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Delivery for ScriptedDelivery {
    fn process(&self, commands: &[String], hosts: &HostGroup, privileged: bool) -> AttestResult<bool> {
        lock(&self.calls).push(DeliveryCall {
            commands: commands.to_vec(),
            hosts: hosts.clone(),
            privileged,
        });

        let reply = if commands.iter().any(|c| self.failing.contains(c)) {
            Reply::Fail
        } else {
            lock(&self.queued).pop_front().unwrap_or_else(|| self.default.clone())
        };

        debug!(hosts = %hosts, command_count = commands.len(), reply = ?reply, "scripted delivery");
        reply.into_result()
    }
}

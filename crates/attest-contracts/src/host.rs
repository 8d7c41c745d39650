//! Target host groups and pipeline phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque reference to the set of machines a verification runs against.
///
/// The engine never resolves these names; they are handed to the delivery
/// collaborator as-is. Example: `HostGroup::new(["web", "app"])`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostGroup(pub Vec<String>);

impl HostGroup {
    /// Construct a group from any list of string-like names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Return the names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HostGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Which side of an install step a verification runs on.
///
/// The engine does not branch on this; it exists so logs, journal records,
/// and callers can tell a pre-flight check from a post-deployment one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Checked before installing, to detect an already-satisfied package.
    Pre,
    /// Checked after installing; failure aborts the run.
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pre => f.write_str("pre"),
            Phase::Post => f.write_str("post"),
        }
    }
}

//! Manifest schema.
//!
//! A manifest is a TOML document with an optional `[run]` table and an
//! ordered list of `[[verify]]` entries. Each entry becomes one
//! `VerificationSpec`; its `checks` and `commands` arrays are the builder
//! block.
//!
//! Example:
//! ```toml
//! [run]
//! verbose = true
//!
//! [[verify]]
//! description = "nginx config"
//! hosts = ["web"]
//! checks = [
//!   { predicate = "has_file", args = ["/etc/nginx/nginx.conf"] },
//!   { predicate = "has_process", args = ["nginx"] },
//! ]
//! commands = ["test -s /var/log/nginx/access.log"]
//! ```

use serde::{Deserialize, Serialize};

use attest_contracts::config::RunConfig;

/// One predicate call inside a `[[verify]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCall {
    /// Registered predicate name, e.g. `"has_file"`.
    pub predicate: String,
    /// Positional string arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A single `[[verify]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEntry {
    /// Shown in progress lines and failure messages.
    pub description: String,

    /// Host group the entry is verified against.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Progress-line indentation override.
    pub indent: Option<usize>,

    /// Predicate calls, applied first and in order.
    pub checks: Option<Vec<CheckCall>>,

    /// Raw shell predicates, appended after `checks`.
    pub commands: Option<Vec<String>>,
}

impl VerifyEntry {
    /// An entry with neither `checks` nor `commands` declares no builder
    /// block at all. An explicit empty list is an empty block.
    pub fn has_block(&self) -> bool {
        self.checks.is_some() || self.commands.is_some()
    }
}

/// The top-level structure deserialized from a manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub run: RunConfig,

    /// Ordered verification entries.
    #[serde(default)]
    pub verify: Vec<VerifyEntry>,
}

//! # attest-predicates
//!
//! The standard predicate modules for attest.
//!
//! Each module is a [`PredicateModule`] that the hosting application
//! registers into a [`PredicateRegistry`]. Nothing here is known to the
//! engine; a deployment that needs other checks registers its own modules
//! next to these.
//!
//! | Module        | Predicates                                   |
//! |---------------|----------------------------------------------|
//! | `files`       | `has_file`, `file_contains`, `has_symlink`   |
//! | `directories` | `has_directory`                              |
//! | `permissions` | `has_permission`, `belongs_to_user`          |
//! | `executables` | `has_executable`, `has_executables`          |
//! | `processes`   | `has_process`                                |
//! | `users`       | `has_user`, `has_group`                      |
//! | `packages`    | `has_apt`, `has_rpm`                         |
//! | `ruby`        | `has_gem`, `ruby_can_load`                   |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use attest_predicates::StandardChecks;
//!
//! let predicates = attest_predicates::standard()?.seal();
//! let spec = VerificationSpec::build(&predicates, "nginx", |b| {
//!     b.has_apt("nginx").has_process("nginx");
//! })?;
//! ```

mod args;
pub mod fs;
pub mod packages;
pub mod system;

use tracing::debug;

use attest_contracts::error::AttestResult;
use attest_core::{PredicateModule, PredicateRegistry, SpecBuilder};

pub use fs::{DirectoryChecks, FileChecks, PermissionChecks};
pub use packages::{PackageChecks, RubyChecks};
pub use system::{ExecutableChecks, ProcessChecks, UserChecks};

/// Register every standard module into `registry`.
pub fn register_standard(registry: &mut PredicateRegistry) -> AttestResult<()> {
    registry.register(FileChecks)?;
    registry.register(DirectoryChecks)?;
    registry.register(PermissionChecks)?;
    registry.register(ExecutableChecks)?;
    registry.register(ProcessChecks)?;
    registry.register(UserChecks)?;
    registry.register(PackageChecks)?;
    registry.register(RubyChecks)?;
    debug!("standard predicate modules registered");
    Ok(())
}

/// A registry holding every standard module. Register extra modules on it
/// before sealing.
pub fn standard() -> AttestResult<PredicateRegistry> {
    let mut registry = PredicateRegistry::new();
    register_standard(&mut registry)?;
    Ok(registry)
}

/// Names of the standard modules, in registration order.
pub fn standard_modules() -> [&'static str; 8] {
    [
        FileChecks.name(),
        DirectoryChecks.name(),
        PermissionChecks.name(),
        ExecutableChecks.name(),
        ProcessChecks.name(),
        UserChecks.name(),
        PackageChecks.name(),
        RubyChecks.name(),
    ]
}

/// Typed builder methods for the standard predicates.
///
/// Every method resolves its predicate by name through the builder's
/// predicate set, so a builder over a set without the matching module fails
/// with `UnknownPredicate` like any other unregistered call.
pub trait StandardChecks {
    fn has_file(&mut self, path: &str) -> &mut Self;
    fn file_contains(&mut self, path: &str, text: &str) -> &mut Self;
    fn has_symlink(&mut self, link: &str, target: Option<&str>) -> &mut Self;
    fn has_directory(&mut self, path: &str) -> &mut Self;
    fn has_permission(&mut self, path: &str, mode: &str) -> &mut Self;
    fn belongs_to_user(&mut self, path: &str, user: &str) -> &mut Self;
    fn has_executable(&mut self, name: &str) -> &mut Self;
    fn has_executables(&mut self, names: &[&str]) -> &mut Self;
    fn has_process(&mut self, name: &str) -> &mut Self;
    fn has_user(&mut self, user: &str, in_group: Option<&str>) -> &mut Self;
    fn has_group(&mut self, group: &str) -> &mut Self;
    fn has_apt(&mut self, package: &str) -> &mut Self;
    fn has_rpm(&mut self, package: &str) -> &mut Self;
    fn has_gem(&mut self, name: &str, version: Option<&str>) -> &mut Self;
    fn ruby_can_load(&mut self, files: &[&str]) -> &mut Self;
}

impl StandardChecks for SpecBuilder<'_> {
    fn has_file(&mut self, path: &str) -> &mut Self {
        self.check("has_file", &[path])
    }

    fn file_contains(&mut self, path: &str, text: &str) -> &mut Self {
        self.check("file_contains", &[path, text])
    }

    fn has_symlink(&mut self, link: &str, target: Option<&str>) -> &mut Self {
        match target {
            Some(target) => self.check("has_symlink", &[link, target]),
            None => self.check("has_symlink", &[link]),
        }
    }

    fn has_directory(&mut self, path: &str) -> &mut Self {
        self.check("has_directory", &[path])
    }

    fn has_permission(&mut self, path: &str, mode: &str) -> &mut Self {
        self.check("has_permission", &[path, mode])
    }

    fn belongs_to_user(&mut self, path: &str, user: &str) -> &mut Self {
        self.check("belongs_to_user", &[path, user])
    }

    fn has_executable(&mut self, name: &str) -> &mut Self {
        self.check("has_executable", &[name])
    }

    fn has_executables(&mut self, names: &[&str]) -> &mut Self {
        self.check("has_executables", names)
    }

    fn has_process(&mut self, name: &str) -> &mut Self {
        self.check("has_process", &[name])
    }

    fn has_user(&mut self, user: &str, in_group: Option<&str>) -> &mut Self {
        match in_group {
            Some(group) => self.check("has_user", &[user, group]),
            None => self.check("has_user", &[user]),
        }
    }

    fn has_group(&mut self, group: &str) -> &mut Self {
        self.check("has_group", &[group])
    }

    fn has_apt(&mut self, package: &str) -> &mut Self {
        self.check("has_apt", &[package])
    }

    fn has_rpm(&mut self, package: &str) -> &mut Self {
        self.check("has_rpm", &[package])
    }

    fn has_gem(&mut self, name: &str, version: Option<&str>) -> &mut Self {
        match version {
            Some(version) => self.check("has_gem", &[name, version]),
            None => self.check("has_gem", &[name]),
        }
    }

    fn ruby_can_load(&mut self, files: &[&str]) -> &mut Self {
        self.check("ruby_can_load", files)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The predicate registry.
//!
//! Predicate modules contribute named predicate builders. Each builder turns
//! the string arguments given at a call site into one or more shell commands
//! whose exit status encodes the check. The engine never knows what a
//! predicate means; new checks are added by registering modules, not by
//! touching the engine.
//!
//! Registration happens on a mutable `PredicateRegistry`. `seal()` turns it
//! into `Predicates`, the read-only view every spec is built against, so a
//! predicate can never be registered after a spec has started using the set.
//!
//! Collision policy: a predicate name belongs to exactly one module. A module
//! that tries to reuse a name is rejected as a whole.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use attest_contracts::error::{AttestError, AttestResult};

/// A predicate builder.
///
/// Receives the call-site arguments and returns the commands to append.
/// Returns `AttestError::InvalidArguments` for calls it cannot compile.
pub type PredicateFn = Arc<dyn Fn(&[String]) -> AttestResult<Vec<String>> + Send + Sync>;

/// Wrap a closure as a `PredicateFn`.
pub fn predicate<F>(f: F) -> PredicateFn
where
    F: Fn(&[String]) -> AttestResult<Vec<String>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A capability module: a named bundle of predicate builders.
pub trait PredicateModule {
    /// Stable module name, reported in collisions and listings.
    fn name(&self) -> &'static str;

    /// The predicate builders this module contributes, keyed by the name
    /// used in builder blocks and manifests.
    fn predicates(&self) -> Vec<(&'static str, PredicateFn)>;
}

struct Entry {
    module: &'static str,
    build: PredicateFn,
}

/// The registration-time predicate set.
///
/// Registration is additive and never revocable. Call `seal()` once every
/// module is registered.
#[derive(Default)]
pub struct PredicateRegistry {
    modules: Vec<&'static str>,
    entries: BTreeMap<String, Entry>,
}

impl PredicateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every predicate of `module` into the registry.
    ///
    /// Fails with `ModuleAlreadyRegistered` if a module of the same name was
    /// registered before, and with `PredicateCollision` if any of its
    /// predicate names is already taken. On failure nothing is merged.
    pub fn register(&mut self, module: impl PredicateModule) -> AttestResult<()> {
        let name = module.name();
        if self.modules.contains(&name) {
            return Err(AttestError::ModuleAlreadyRegistered {
                module: name.to_string(),
            });
        }

        let contributed = module.predicates();

        let mut seen = HashSet::new();
        for (predicate, _) in &contributed {
            if let Some(existing) = self.entries.get(*predicate) {
                return Err(AttestError::PredicateCollision {
                    predicate: predicate.to_string(),
                    existing_module: existing.module.to_string(),
                    module: name.to_string(),
                });
            }
            if !seen.insert(*predicate) {
                return Err(AttestError::PredicateCollision {
                    predicate: predicate.to_string(),
                    existing_module: name.to_string(),
                    module: name.to_string(),
                });
            }
        }

        debug!(module = name, predicate_count = contributed.len(), "registering predicate module");

        for (predicate, build) in contributed {
            self.entries.insert(predicate.to_string(), Entry { module: name, build });
        }
        self.modules.push(name);
        Ok(())
    }

    /// Freeze the registry. No module can be added afterwards.
    pub fn seal(self) -> Predicates {
        Predicates {
            inner: Arc::new(self),
        }
    }
}

/// The sealed, read-only predicate set.
///
/// Cheap to clone; every clone sees the same modules for as long as it lives.
#[derive(Clone)]
pub struct Predicates {
    inner: Arc<PredicateRegistry>,
}

impl Predicates {
    /// Look up a predicate builder by name.
    pub fn get(&self, name: &str) -> Option<&PredicateFn> {
        self.inner.entries.get(name).map(|e| &e.build)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.entries.contains_key(name)
    }

    /// The module that contributed `name`, if any.
    pub fn owner(&self, name: &str) -> Option<&'static str> {
        self.inner.entries.get(name).map(|e| e.module)
    }

    /// All predicate names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.entries.keys().map(String::as_str)
    }

    /// Module names in registration order.
    pub fn modules(&self) -> &[&'static str] {
        &self.inner.modules
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl fmt::Debug for Predicates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicates")
            .field("modules", &self.inner.modules)
            .field("predicates", &self.inner.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use attest_contracts::error::AttestError;

    use super::{predicate, PredicateFn, PredicateModule, PredicateRegistry};

    struct FileModule;

    impl PredicateModule for FileModule {
        fn name(&self) -> &'static str {
            "files"
        }

        fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
            vec![
                ("has_file", predicate(|args| Ok(vec![format!("test -f {}", args[0])]))),
                ("has_directory", predicate(|args| Ok(vec![format!("test -d {}", args[0])]))),
            ]
        }
    }

    /// A module whose only predicate reuses a name owned by `FileModule`.
    struct ShadowModule;

    impl PredicateModule for ShadowModule {
        fn name(&self) -> &'static str {
            "shadow"
        }

        fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
            vec![
                ("has_process", predicate(|args| Ok(vec![format!("pgrep {}", args[0])]))),
                ("has_file", predicate(|_| Ok(vec!["true".to_string()]))),
            ]
        }
    }

    struct DuplicateInsideModule;

    impl PredicateModule for DuplicateInsideModule {
        fn name(&self) -> &'static str {
            "dup"
        }

        fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
            vec![
                ("twice", predicate(|_| Ok(vec![]))),
                ("twice", predicate(|_| Ok(vec![]))),
            ]
        }
    }

    #[test]
    fn test_register_makes_predicates_available() {
        let mut registry = PredicateRegistry::new();
        registry.register(FileModule).unwrap();
        let predicates = registry.seal();

        assert!(predicates.contains("has_file"));
        assert!(predicates.contains("has_directory"));
        assert_eq!(predicates.owner("has_file"), Some("files"));
        assert_eq!(predicates.modules(), &["files"]);

        let build = predicates.get("has_file").unwrap();
        assert_eq!(build(&["/etc/hosts".to_string()]).unwrap(), vec!["test -f /etc/hosts"]);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = PredicateRegistry::new();
        registry.register(FileModule).unwrap();
        let predicates = registry.seal();

        let names: Vec<&str> = predicates.names().collect();
        assert_eq!(names, vec!["has_directory", "has_file"]);
    }

    /// A name collision is rejected, and none of the offending module's
    /// predicates leak into the registry.
    #[test]
    fn test_collision_is_rejected_atomically() {
        let mut registry = PredicateRegistry::new();
        registry.register(FileModule).unwrap();

        match registry.register(ShadowModule) {
            Err(AttestError::PredicateCollision { predicate, existing_module, module }) => {
                assert_eq!(predicate, "has_file");
                assert_eq!(existing_module, "files");
                assert_eq!(module, "shadow");
            }
            other => panic!("expected PredicateCollision, got {:?}", other),
        }

        let predicates = registry.seal();
        assert!(!predicates.contains("has_process"));
        assert_eq!(predicates.owner("has_file"), Some("files"));
        assert_eq!(predicates.modules(), &["files"]);
    }

    #[test]
    fn test_duplicate_name_inside_one_module() {
        let mut registry = PredicateRegistry::new();
        let result = registry.register(DuplicateInsideModule);
        assert!(matches!(result, Err(AttestError::PredicateCollision { .. })));
        assert!(registry.seal().is_empty());
    }

    #[test]
    fn test_module_registered_twice() {
        let mut registry = PredicateRegistry::new();
        registry.register(FileModule).unwrap();

        match registry.register(FileModule) {
            Err(AttestError::ModuleAlreadyRegistered { module }) => assert_eq!(module, "files"),
            other => panic!("expected ModuleAlreadyRegistered, got {:?}", other),
        }
    }

    /// Clones of a sealed set share the same predicates.
    #[test]
    fn test_sealed_clones_share_predicates() {
        let mut registry = PredicateRegistry::new();
        registry.register(FileModule).unwrap();
        let predicates = registry.seal();
        let clone = predicates.clone();
        drop(predicates);

        assert_eq!(clone.len(), 2);
        assert!(clone.contains("has_directory"));
    }
}

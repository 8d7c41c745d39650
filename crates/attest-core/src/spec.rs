//! Verification specs and the builder that assembles them.
//!
//! A spec is a description plus an ordered list of shell predicates. It is
//! declared with a builder block: a function that receives a `SpecBuilder`
//! and calls predicates on it. Each call appends the commands the predicate
//! produces, in call order. Once the block returns the spec is frozen.
//!
//! ```rust,ignore
//! let spec = VerificationSpec::build(&predicates, "nginx config", |b| {
//!     b.check("has_file", &["/etc/nginx/nginx.conf"]);
//!     b.check("has_process", &["nginx"]);
//! })?;
//! ```

use serde::Serialize;

use attest_contracts::error::{AttestError, AttestResult};

use crate::registry::Predicates;

/// Display-only settings. Never affect the verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecOptions {
    /// Number of spaces the progress line is indented by.
    pub indent: usize,
}

impl Default for SpecOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// An immutable bundle of a description and its predicate commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSpec {
    description: String,
    commands: Vec<String>,
    options: SpecOptions,
}

impl VerificationSpec {
    /// Declare a spec from an optional builder block.
    ///
    /// A missing block fails with `MissingBuilder` whatever the description
    /// says. A blank description fails with `EmptyDescription`. Otherwise the
    /// block runs against `predicates`, and the first error it hit (unknown
    /// predicate, bad arguments) is returned.
    pub fn define<F>(
        predicates: &Predicates,
        description: impl Into<String>,
        block: Option<F>,
    ) -> AttestResult<Self>
    where
        F: FnOnce(&mut SpecBuilder<'_>),
    {
        let block = block.ok_or(AttestError::MissingBuilder)?;

        let description = description.into();
        if description.trim().is_empty() {
            return Err(AttestError::EmptyDescription);
        }

        let mut builder = SpecBuilder::new(predicates);
        block(&mut builder);
        builder.finish(description)
    }

    /// Declare a spec from a builder block.
    pub fn build<F>(
        predicates: &Predicates,
        description: impl Into<String>,
        block: F,
    ) -> AttestResult<Self>
    where
        F: FnOnce(&mut SpecBuilder<'_>),
    {
        Self::define(predicates, description, Some(block))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The predicate commands, in the order they were declared.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn options(&self) -> &SpecOptions {
        &self.options
    }
}

/// The context a builder block runs in.
///
/// Every registered predicate is callable through `check`. Standard
/// predicates also have typed methods through extension traits (see the
/// `attest-predicates` crate). The first error is sticky: later calls are
/// ignored and the spec fails with that error.
pub struct SpecBuilder<'p> {
    predicates: &'p Predicates,
    commands: Vec<String>,
    options: SpecOptions,
    error: Option<AttestError>,
}

impl<'p> SpecBuilder<'p> {
    fn new(predicates: &'p Predicates) -> Self {
        Self {
            predicates,
            commands: Vec::new(),
            options: SpecOptions::default(),
            error: None,
        }
    }

    /// Call the predicate registered as `name` and append its commands.
    pub fn check(&mut self, name: &str, args: &[&str]) -> &mut Self {
        if self.error.is_some() {
            return self;
        }

        let Some(build) = self.predicates.get(name) else {
            self.error = Some(AttestError::UnknownPredicate {
                predicate: name.to_string(),
            });
            return self;
        };

        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        match build(&args) {
            Ok(commands) => self.commands.extend(commands),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Append a raw shell predicate.
    pub fn command(&mut self, command: impl Into<String>) -> &mut Self {
        if self.error.is_none() {
            self.commands.push(command.into());
        }
        self
    }

    /// Set the progress-line indentation.
    pub fn indent(&mut self, indent: usize) -> &mut Self {
        self.options.indent = indent;
        self
    }

    /// The predicate set this block resolves names against.
    pub fn predicates(&self) -> &Predicates {
        self.predicates
    }

    fn finish(self, description: String) -> AttestResult<VerificationSpec> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(VerificationSpec {
            description,
            commands: self.commands,
            options: self.options,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use attest_contracts::error::{AttestError, AttestResult};

    use crate::registry::{predicate, PredicateFn, PredicateModule, PredicateRegistry, Predicates};

    use super::{SpecBuilder, VerificationSpec};

    // ── Helpers ───────────────────────────────────────────────────────────────

    struct TestModule;

    impl PredicateModule for TestModule {
        fn name(&self) -> &'static str {
            "test"
        }

        fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
            vec![
                ("has_file", predicate(|args| Ok(vec![format!("test -f {}", args[0])]))),
                (
                    "has_files",
                    predicate(|args| Ok(args.iter().map(|a| format!("test -f {a}")).collect())),
                ),
                ("nothing", predicate(|_| Ok(vec![]))),
                (
                    "strict",
                    predicate(|args| -> AttestResult<Vec<String>> {
                        Err(AttestError::InvalidArguments {
                            predicate: "strict".to_string(),
                            reason: format!("got {} arguments", args.len()),
                        })
                    }),
                ),
            ]
        }
    }

    fn predicates() -> Predicates {
        let mut registry = PredicateRegistry::new();
        registry.register(TestModule).unwrap();
        registry.seal()
    }

    type Block = fn(&mut SpecBuilder<'_>);

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_missing_block_fails_for_any_description() {
        let predicates = predicates();
        for description in ["nginx config", "", "   "] {
            let result = VerificationSpec::define::<Block>(&predicates, description, None);
            assert!(
                matches!(result, Err(AttestError::MissingBuilder)),
                "description {description:?} should fail with MissingBuilder"
            );
        }
    }

    #[test]
    fn test_blank_description_fails() {
        let result = VerificationSpec::build(&predicates(), "  ", |b| {
            b.check("has_file", &["/etc/hosts"]);
        });
        assert!(matches!(result, Err(AttestError::EmptyDescription)));
    }

    #[test]
    fn test_empty_block_builds_empty_spec() {
        let spec = VerificationSpec::build(&predicates(), "nothing to check", |_| {}).unwrap();
        assert!(spec.commands().is_empty());
        assert_eq!(spec.description(), "nothing to check");
    }

    // ── Accumulation ──────────────────────────────────────────────────────────

    /// Commands are appended in call order, and the total is the sum of what
    /// each call produced.
    #[test]
    fn test_commands_accumulate_in_call_order() {
        let spec = VerificationSpec::build(&predicates(), "web files", |b| {
            b.check("has_file", &["/a"]);
            b.check("nothing", &[]);
            b.check("has_files", &["/b", "/c"]);
            b.command("test -s /d");
        })
        .unwrap();

        assert_eq!(
            spec.commands(),
            &["test -f /a", "test -f /b", "test -f /c", "test -s /d"]
        );
        assert_eq!(spec.commands().len(), 1 + 0 + 2 + 1);
    }

    #[test]
    fn test_builder_calls_chain() {
        let spec = VerificationSpec::build(&predicates(), "chained", |b| {
            b.check("has_file", &["/a"]).indent(2).command("true");
        })
        .unwrap();

        assert_eq!(spec.commands().len(), 2);
        assert_eq!(spec.options().indent, 2);
    }

    #[test]
    fn test_default_indent() {
        let spec = VerificationSpec::build(&predicates(), "defaults", |_| {}).unwrap();
        assert_eq!(spec.options().indent, 4);
    }

    // ── Errors inside the block ───────────────────────────────────────────────

    #[test]
    fn test_unknown_predicate_fails_construction() {
        let result = VerificationSpec::build(&predicates(), "typo", |b| {
            b.check("has_fiel", &["/etc/hosts"]);
        });

        match result {
            Err(AttestError::UnknownPredicate { predicate }) => assert_eq!(predicate, "has_fiel"),
            other => panic!("expected UnknownPredicate, got {:?}", other),
        }
    }

    /// The first error wins; later calls neither append nor overwrite it.
    #[test]
    fn test_first_error_is_sticky() {
        let result = VerificationSpec::build(&predicates(), "sticky", |b| {
            b.check("strict", &["x"]);
            b.check("missing", &[]);
            b.command("true");
        });

        match result {
            Err(AttestError::InvalidArguments { predicate, reason }) => {
                assert_eq!(predicate, "strict");
                assert!(reason.contains("1 arguments"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_exposes_predicate_set() {
        VerificationSpec::build(&predicates(), "introspect", |b| {
            assert!(b.predicates().contains("has_file"));
        })
        .unwrap();
    }
}

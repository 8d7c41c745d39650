//! Package-manager predicates: Debian and RPM packages, Ruby gems.

use attest_contracts::error::{AttestError, AttestResult};
use attest_core::registry::{predicate, PredicateFn, PredicateModule};

use crate::args::{arity, quote};

/// `has_apt`, `has_rpm`.
pub struct PackageChecks;

impl PredicateModule for PackageChecks {
    fn name(&self) -> &'static str {
        "packages"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_apt",
                predicate(|args| {
                    let args = arity("has_apt", args, 1, 1)?;
                    Ok(vec![format!(
                        "dpkg -s {} 2>/dev/null | grep -q 'ok installed'",
                        quote(&args[0])
                    )])
                }),
            ),
            (
                "has_rpm",
                predicate(|args| {
                    let args = arity("has_rpm", args, 1, 1)?;
                    Ok(vec![format!("rpm -q {} >/dev/null", quote(&args[0]))])
                }),
            ),
        ]
    }
}

/// `has_gem`, `ruby_can_load`.
pub struct RubyChecks;

impl PredicateModule for RubyChecks {
    fn name(&self) -> &'static str {
        "ruby"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_gem",
                predicate(|args| {
                    let args = arity("has_gem", args, 1, 2)?;
                    let mut command = format!("gem list {} --installed", quote(&args[0]));
                    if let Some(version) = args.get(1) {
                        command.push_str(&format!(" --version {}", quote(version)));
                    }
                    command.push_str(" >/dev/null");
                    Ok(vec![command])
                }),
            ),
            ("ruby_can_load", predicate(ruby_can_load)),
        ]
    }
}

/// All files are required in one interpreter so load-order dependencies
/// between them behave as they would in the application.
fn ruby_can_load(args: &[String]) -> AttestResult<Vec<String>> {
    let args = arity("ruby_can_load", args, 1, usize::MAX)?;
    if let Some(bad) = args
        .iter()
        .find(|a| a.chars().any(|c| matches!(c, '\'' | '"' | '\\' | '$' | '`')))
    {
        return Err(AttestError::InvalidArguments {
            predicate: "ruby_can_load".to_string(),
            reason: format!("'{bad}' contains quote or expansion characters"),
        });
    }

    let requires = args
        .iter()
        .map(|f| format!("require '{f}'"))
        .collect::<Vec<_>>()
        .join("; ");
    Ok(vec![format!("ruby -e \"{requires}\"")])
}

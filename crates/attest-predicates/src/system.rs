//! Runtime-state predicates: executables, processes, users and groups.

use attest_contracts::error::AttestResult;
use attest_core::registry::{predicate, PredicateFn, PredicateModule};

use crate::args::{arity, quote};

/// A path is tested for the executable bit; a bare name is looked up on
/// `PATH`.
fn executable(name: &str) -> String {
    if name.contains('/') {
        format!("test -x {}", quote(name))
    } else {
        format!("command -v {} >/dev/null", quote(name))
    }
}

/// `has_executable`, `has_executables`.
pub struct ExecutableChecks;

impl PredicateModule for ExecutableChecks {
    fn name(&self) -> &'static str {
        "executables"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_executable",
                predicate(|args| {
                    let args = arity("has_executable", args, 1, 1)?;
                    Ok(vec![executable(&args[0])])
                }),
            ),
            (
                "has_executables",
                predicate(|args| -> AttestResult<Vec<String>> {
                    let args = arity("has_executables", args, 1, usize::MAX)?;
                    Ok(args.iter().map(|a| executable(a)).collect())
                }),
            ),
        ]
    }
}

/// `has_process`.
pub struct ProcessChecks;

impl PredicateModule for ProcessChecks {
    fn name(&self) -> &'static str {
        "processes"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![(
            "has_process",
            predicate(|args| {
                let args = arity("has_process", args, 1, 1)?;
                Ok(vec![format!("pgrep -x {} >/dev/null", quote(&args[0]))])
            }),
        )]
    }
}

/// `has_user`, `has_group`.
pub struct UserChecks;

impl PredicateModule for UserChecks {
    fn name(&self) -> &'static str {
        "users"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_user",
                predicate(|args| {
                    let args = arity("has_user", args, 1, 2)?;
                    let user = quote(&args[0]);
                    Ok(vec![match args.get(1) {
                        None => format!("id {user} >/dev/null"),
                        // One group per line; `grep -w` would treat `-` as a boundary.
                        Some(group) => format!(
                            "id -nG {user} | tr ' ' '\\n' | grep -Fxq -- {}",
                            quote(group)
                        ),
                    }])
                }),
            ),
            (
                "has_group",
                predicate(|args| {
                    let args = arity("has_group", args, 1, 1)?;
                    Ok(vec![format!("getent group {} >/dev/null", quote(&args[0]))])
                }),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use attest_contracts::error::AttestError;
    use attest_core::registry::PredicateModule;

    use super::{ExecutableChecks, ProcessChecks, UserChecks};

    fn run(module: &dyn PredicateModule, name: &str, args: &[&str]) -> Result<Vec<String>, AttestError> {
        let (_, build) = module
            .predicates()
            .into_iter()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("{name} not provided by {}", module.name()));
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        build(&args)
    }

    #[test]
    fn executable_by_path_checks_mode_bit() {
        assert_eq!(
            run(&ExecutableChecks, "has_executable", &["/usr/sbin/nginx"]).unwrap(),
            vec!["test -x /usr/sbin/nginx"]
        );
    }

    #[test]
    fn executable_by_name_searches_path() {
        assert_eq!(
            run(&ExecutableChecks, "has_executable", &["git"]).unwrap(),
            vec!["command -v git >/dev/null"]
        );
    }

    /// One command per executable, in argument order.
    #[test]
    fn has_executables_expands_each_name() {
        assert_eq!(
            run(&ExecutableChecks, "has_executables", &["ruby", "/usr/bin/gem", "rake"]).unwrap(),
            vec![
                "command -v ruby >/dev/null",
                "test -x /usr/bin/gem",
                "command -v rake >/dev/null",
            ]
        );
    }

    #[test]
    fn has_executables_requires_a_name() {
        assert!(matches!(
            run(&ExecutableChecks, "has_executables", &[]),
            Err(AttestError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn has_process_matches_exact_name() {
        assert_eq!(
            run(&ProcessChecks, "has_process", &["nginx"]).unwrap(),
            vec!["pgrep -x nginx >/dev/null"]
        );
    }

    #[test]
    fn user_and_group_checks() {
        assert_eq!(
            run(&UserChecks, "has_user", &["deploy"]).unwrap(),
            vec!["id deploy >/dev/null"]
        );
        assert_eq!(
            run(&UserChecks, "has_user", &["deploy", "www-data"]).unwrap(),
            vec!["id -nG deploy | tr ' ' '\\n' | grep -Fxq -- www-data"]
        );
        assert_eq!(
            run(&UserChecks, "has_group", &["www-data"]).unwrap(),
            vec!["getent group www-data >/dev/null"]
        );
    }

    /// Runs the group check against a stubbed `id` that reports `groups`.
    fn in_group(user: &str, group: &str, groups: &str) -> bool {
        let command = run(&UserChecks, "has_user", &[user, group]).unwrap().remove(0);
        let script = format!("id() {{ echo '{groups}'; }}; {command}");
        std::process::Command::new("sh")
            .arg("-c")
            .arg(script)
            .status()
            .unwrap()
            .success()
    }

    /// Group membership matches whole names only, hyphens included.
    #[test]
    fn group_membership_is_exact() {
        assert!(in_group("deploy", "www-data", "deploy www-data"));
        assert!(!in_group("deploy", "www", "deploy www-data"), "deploy is not in group www");
        assert!(!in_group("deploy", "data", "deploy www-data"), "deploy is not in group data");
        assert!(!in_group("deploy", "www-data", "deploy www"));
    }
}

//! Argument checking and shell quoting shared by the standard modules.

use std::borrow::Cow;

use shell_escape::unix::escape;

use attest_contracts::error::{AttestError, AttestResult};

/// Quote `value` for a POSIX shell. Plain paths and names pass through.
pub(crate) fn quote(value: &str) -> String {
    escape(Cow::Borrowed(value)).into_owned()
}

/// Require between `min` and `max` (inclusive) non-empty arguments.
pub(crate) fn arity<'a>(
    predicate: &str,
    args: &'a [String],
    min: usize,
    max: usize,
) -> AttestResult<&'a [String]> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{min}")
        } else if max == usize::MAX {
            format!("at least {min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(AttestError::InvalidArguments {
            predicate: predicate.to_string(),
            reason: format!("expected {expected} argument(s), got {}", args.len()),
        });
    }
    if args.iter().any(|a| a.trim().is_empty()) {
        return Err(AttestError::InvalidArguments {
            predicate: predicate.to_string(),
            reason: "arguments must not be empty".to_string(),
        });
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use attest_contracts::error::AttestError;

    use super::{arity, quote};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn plain_paths_are_not_quoted() {
        assert_eq!(quote("/etc/nginx/nginx.conf"), "/etc/nginx/nginx.conf");
        assert_eq!(quote("nginx"), "nginx");
    }

    #[test]
    fn metacharacters_are_quoted() {
        assert_eq!(quote("/srv/my site"), "'/srv/my site'");
        assert_eq!(quote("a;rm -rf /"), "'a;rm -rf /'");
    }

    #[test]
    fn arity_reports_expected_count() {
        match arity("has_file", &strings(&["/a", "/b"]), 1, 1) {
            Err(AttestError::InvalidArguments { predicate, reason }) => {
                assert_eq!(predicate, "has_file");
                assert!(reason.contains("expected 1 argument"), "unexpected reason: {reason}");
                assert!(reason.contains("got 2"));
            }
            other => panic!("expected InvalidArguments, got {:?}", other),
        }
    }

    #[test]
    fn arity_rejects_blank_arguments() {
        let blank = strings(&[" "]);
        let result = arity("has_file", &blank, 1, 1);
        assert!(matches!(result, Err(AttestError::InvalidArguments { .. })));
    }

    #[test]
    fn arity_open_upper_bound() {
        assert!(arity("has_executables", &strings(&["a", "b", "c"]), 1, usize::MAX).is_ok());
        let err = arity("has_executables", &[], 1, usize::MAX).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}

//! Filesystem predicates: files, symlinks, directories, modes and owners.

use attest_core::registry::{predicate, PredicateFn, PredicateModule};

use crate::args::{arity, quote};

/// `has_file`, `file_contains`, `has_symlink`.
pub struct FileChecks;

impl PredicateModule for FileChecks {
    fn name(&self) -> &'static str {
        "files"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_file",
                predicate(|args| {
                    let args = arity("has_file", args, 1, 1)?;
                    Ok(vec![format!("test -f {}", quote(&args[0]))])
                }),
            ),
            (
                "file_contains",
                predicate(|args| {
                    let args = arity("file_contains", args, 2, 2)?;
                    Ok(vec![format!(
                        "grep -Fq -- {} {}",
                        quote(&args[1]),
                        quote(&args[0])
                    )])
                }),
            ),
            (
                "has_symlink",
                predicate(|args| {
                    let args = arity("has_symlink", args, 1, 2)?;
                    let link = quote(&args[0]);
                    Ok(vec![match args.get(1) {
                        None => format!("test -L {link}"),
                        Some(target) => format!(
                            "test -L {link} && test \"$(readlink {link})\" = {}",
                            quote(target)
                        ),
                    }])
                }),
            ),
        ]
    }
}

/// `has_directory`.
pub struct DirectoryChecks;

impl PredicateModule for DirectoryChecks {
    fn name(&self) -> &'static str {
        "directories"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![(
            "has_directory",
            predicate(|args| {
                let args = arity("has_directory", args, 1, 1)?;
                Ok(vec![format!("test -d {}", quote(&args[0]))])
            }),
        )]
    }
}

/// `has_permission`, `belongs_to_user`.
///
/// Both use `find -maxdepth 0` so the path itself is tested, never its
/// children, and pipe through `grep -q .` because `find` exits zero even
/// when nothing matched.
pub struct PermissionChecks;

impl PredicateModule for PermissionChecks {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn predicates(&self) -> Vec<(&'static str, PredicateFn)> {
        vec![
            (
                "has_permission",
                predicate(|args| {
                    let args = arity("has_permission", args, 2, 2)?;
                    Ok(vec![format!(
                        "find {} -maxdepth 0 -perm {} | grep -q .",
                        quote(&args[0]),
                        quote(&args[1])
                    )])
                }),
            ),
            (
                "belongs_to_user",
                predicate(|args| {
                    let args = arity("belongs_to_user", args, 2, 2)?;
                    Ok(vec![format!(
                        "find {} -maxdepth 0 -user {} | grep -q .",
                        quote(&args[0]),
                        quote(&args[1])
                    )])
                }),
            ),
        ]
    }
}

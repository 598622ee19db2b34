use crate::error::{Result, SpecboardError};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory and file constants
// ---------------------------------------------------------------------------

pub const SPECS_DIR: &str = "specs";
pub const SPECIFY_DIR: &str = ".specify";
pub const SPECIFY_SPECS_DIR: &str = ".specify/specs";

pub const CONTRACTS_DIR: &str = "contracts";
pub const CHECKLISTS_DIR: &str = "checklists";

pub const SPEC_MD: &str = "spec.md";
pub const PLAN_MD: &str = "plan.md";
pub const TASKS_MD: &str = "tasks.md";

/// Constitution locations, most specific first.
pub const CONSTITUTION_CANDIDATES: &[&str] = &[
    ".specify/memory/constitution.md",
    "memory/constitution.md",
    "constitution.md",
];

/// Roots that are always browsable in addition to the user's home directory.
pub const DEFAULT_ALLOWED_ROOTS: &[&str] = &["/Users", "/home"];

// ---------------------------------------------------------------------------
// Project layout helpers
// ---------------------------------------------------------------------------

/// A spec-kit project has either a `specs/` or a `.specify/` directory.
pub fn is_spec_kit_project(root: &Path) -> bool {
    root.join(SPECS_DIR).is_dir() || root.join(SPECIFY_DIR).is_dir()
}

/// The directory holding one subdirectory per feature, if any.
pub fn features_dir(root: &Path) -> Option<PathBuf> {
    [SPECS_DIR, SPECIFY_SPECS_DIR]
        .iter()
        .map(|d| root.join(d))
        .find(|p| p.is_dir())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

// ---------------------------------------------------------------------------
// Path-safety gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSafety {
    pub safe: bool,
    pub resolved_path: PathBuf,
}

/// Expand a leading `~` to the user's home directory.
pub fn normalize_path(input: &str) -> PathBuf {
    let home = home::home_dir();
    match (input, home) {
        ("~", Some(h)) => h,
        (s, Some(h)) if s.starts_with("~/") => h.join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

/// Make `path` absolute against the current directory and fold `.` / `..`
/// lexically. Symlinks are not followed.
pub fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Roots a request may resolve into: home, the conventional user roots, and
/// any extra roots from config.
pub fn allowed_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = home::home_dir().into_iter().collect();
    roots.extend(DEFAULT_ALLOWED_ROOTS.iter().map(PathBuf::from));
    roots.extend(extra.iter().cloned());
    roots
}

pub fn is_path_safe(requested: &str, extra_roots: &[PathBuf]) -> PathSafety {
    let resolved_path = resolve_path(&normalize_path(requested));
    let safe = allowed_roots(extra_roots)
        .iter()
        .any(|root| resolved_path.starts_with(root));
    PathSafety {
        safe,
        resolved_path,
    }
}

/// Gate variant for callers that want an error instead of a flag.
pub fn ensure_path_safe(requested: &str, extra_roots: &[PathBuf]) -> Result<PathBuf> {
    let check = is_path_safe(requested, extra_roots);
    if check.safe {
        Ok(check.resolved_path)
    } else {
        Err(SpecboardError::PathNotAllowed(
            check.resolved_path.display().to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn user_roots_are_safe() {
        assert!(is_path_safe("/home/linuxuser/projects", &[]).safe);
        assert!(is_path_safe("/Users/someone/code", &[]).safe);
    }

    #[test]
    fn system_paths_are_rejected() {
        for p in ["/etc/passwd", "/", "/var/log"] {
            assert!(!is_path_safe(p, &[]).safe, "expected unsafe: {p}");
        }
    }

    #[test]
    fn traversal_is_resolved_before_check() {
        let check = is_path_safe("/home/user/../../../etc/passwd", &[]);
        assert!(!check.safe);
        assert_eq!(check.resolved_path, PathBuf::from("/etc/passwd"));
    }

    #[test]
    fn prefix_match_is_component_wise() {
        assert!(!is_path_safe("/homework/notes", &[]).safe);
    }

    #[test]
    fn extra_roots_extend_allow_list() {
        let extra = vec![PathBuf::from("/srv/projects")];
        assert!(is_path_safe("/srv/projects/app", &extra).safe);
        assert!(ensure_path_safe("/srv/other", &extra).is_err());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home::home_dir() {
            assert_eq!(normalize_path("~"), home);
            assert_eq!(normalize_path("~/code"), home.join("code"));
        }
        assert_eq!(normalize_path("/abs"), PathBuf::from("/abs"));
    }

    #[test]
    fn detects_spec_kit_markers() {
        let dir = TempDir::new().unwrap();
        assert!(!is_spec_kit_project(dir.path()));
        std::fs::create_dir_all(dir.path().join(".specify/specs")).unwrap();
        assert!(is_spec_kit_project(dir.path()));
        assert_eq!(
            features_dir(dir.path()),
            Some(dir.path().join(".specify/specs"))
        );

        std::fs::create_dir_all(dir.path().join("specs")).unwrap();
        assert_eq!(features_dir(dir.path()), Some(dir.path().join("specs")));
    }
}

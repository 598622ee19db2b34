use specboard_core::paths::is_spec_kit_project;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `SPECBOARD_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `specs/` or `.specify/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root(&cwd).unwrap_or(cwd)
}

/// Nearest ancestor of `start` (inclusive) that is a spec-kit project.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_spec_kit_project(dir))
        .map(Path::to_path_buf)
}

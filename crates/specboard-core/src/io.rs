use crate::error::Result;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a UTF-8 text file, absorbing failures.
///
/// A missing file is silent; any other failure (permissions, invalid UTF-8)
/// is logged and also reported as `None` so one bad file never aborts a scan.
pub async fn read_optional(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable file treated as absent");
            None
        }
    }
}

/// Names of the entries of `dir` that satisfy `keep`, sorted. Unreadable or
/// missing directories yield an empty list.
pub async fn list_sorted<F>(dir: &Path, mut keep: F) -> Vec<String>
where
    F: FnMut(&str, &std::fs::FileType) -> bool,
{
    let mut names = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory");
            }
            return names;
        }
    };
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };
                let name = entry.file_name().to_string_lossy().into_owned();
                if keep(&name, &file_type) {
                    names.push(name);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "directory listing interrupted");
                break;
            }
        }
    }
    names.sort();
    names
}

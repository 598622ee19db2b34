pub mod feature;
pub mod metrics;
pub mod recent;
pub mod scan;
pub mod serve;
pub mod toggle;
pub mod watch;

use anyhow::Context;
use specboard_core::project::{try_scan, Project};
use std::path::Path;

/// Scan `root` on a throwaway runtime.
pub fn scan_blocking(root: &Path) -> anyhow::Result<Project> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(try_scan(root))
        .with_context(|| format!("cannot scan {}", root.display()))
}

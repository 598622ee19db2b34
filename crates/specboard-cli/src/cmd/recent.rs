use crate::output::{print_json, print_table};
use clap::Subcommand;
use specboard_core::config::Config;
use specboard_core::paths::resolve_path;
use specboard_core::recent::{JsonFileStore, RecentProjects};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum RecentSubcommand {
    /// List recent projects, newest first
    List,
    /// Record a project as most recently opened (default: current root)
    Add { path: Option<PathBuf> },
    /// Forget all recent projects
    Clear,
}

pub fn run(
    root: &Path,
    config: &Config,
    subcommand: Option<RecentSubcommand>,
    json: bool,
) -> anyhow::Result<()> {
    let store = JsonFileStore::default_location()?;
    let mut recent = RecentProjects::open(Box::new(store), config.recent_limit);

    match subcommand.unwrap_or(RecentSubcommand::List) {
        RecentSubcommand::List => {}
        RecentSubcommand::Add { path } => {
            let path = resolve_path(path.as_deref().unwrap_or(root));
            recent.add(&path.to_string_lossy())?;
        }
        RecentSubcommand::Clear => recent.clear()?,
    }

    if json {
        return print_json(&recent.list());
    }
    if recent.list().is_empty() {
        println!("No recent projects.");
        return Ok(());
    }
    let rows = recent
        .list()
        .iter()
        .enumerate()
        .map(|(i, p)| vec![(i + 1).to_string(), p.clone()])
        .collect();
    print_table(&["#", "PATH"], rows);
    Ok(())
}

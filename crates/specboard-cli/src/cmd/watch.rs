use crate::output::{print_json_line, progress};
use specboard_core::config::Config;
use specboard_core::paths::is_spec_kit_project;
use specboard_core::watch::{subscribe, WatchOptions};
use specboard_core::SpecboardError;
use std::path::Path;

pub fn run(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    if !is_spec_kit_project(root) {
        return Err(SpecboardError::NotAProject(root.to_path_buf()).into());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut sub = subscribe(root, WatchOptions::from_config(config));
        loop {
            let event = tokio::select! {
                ev = sub.next_event() => ev,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(event) = event else {
                break;
            };
            if json {
                print_json_line(&event)?;
                continue;
            }
            let project = event.project();
            let (done, total) = project
                .features
                .iter()
                .fold((0, 0), |(d, t), f| (d + f.completed_tasks, t + f.total_tasks));
            println!(
                "{} {}: {} features, tasks {}",
                project.last_updated.format("%H:%M:%S"),
                project.name,
                project.features.len(),
                progress(done, total)
            );
        }
        sub.close();
        Ok(())
    })
}

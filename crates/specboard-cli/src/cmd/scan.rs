use crate::output::{print_json, print_table, progress};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let project = super::scan_blocking(root)?;

    if json {
        return print_json(&project);
    }

    println!("Project: {} ({})", project.name, project.path.display());
    if project.features.is_empty() {
        println!("No features found.");
        return Ok(());
    }

    let rows = project
        .features
        .iter()
        .map(|f| {
            vec![
                f.id.clone(),
                f.stage.to_string(),
                progress(f.completed_tasks, f.total_tasks),
                f.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "STAGE", "TASKS", "NAME"], rows);

    if let Some(constitution) = &project.constitution {
        println!(
            "\nConstitution: {} principles{}",
            constitution.principles.len(),
            constitution
                .version
                .as_deref()
                .map(|v| format!(", version {v}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

use crate::output::{print_json, print_table, progress};
use specboard_core::metrics::compute_metrics;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let project = super::scan_blocking(root)?;
    let m = compute_metrics(&project);

    if json {
        return print_json(&m);
    }

    println!("Features:       {}", m.total_features);
    println!("Tasks:          {}", progress(m.completed_tasks, m.total_tasks));
    println!("In progress:    {}", m.in_progress_tasks);
    println!("Pending:        {}", m.pending_tasks);
    println!("Clarifications: {}", m.total_clarifications);
    if m.total_checklist_items > 0 {
        println!(
            "Checklists:     {}",
            progress(m.completed_checklist_items, m.total_checklist_items)
        );
    }

    println!();
    let rows = m
        .features_by_stage
        .iter()
        .map(|(stage, count)| vec![stage.to_string(), count.to_string()])
        .collect();
    print_table(&["STAGE", "FEATURES"], rows);

    if !m.tasks_by_phase.is_empty() {
        println!();
        let rows = m
            .tasks_by_phase
            .iter()
            .map(|b| vec![b.phase.clone(), b.count.to_string()])
            .collect();
        print_table(&["PHASE", "TASKS"], rows);
    }
    Ok(())
}

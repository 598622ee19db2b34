use crate::output::{print_json, progress};
use specboard_core::parser::TaskGrouping;
use std::path::Path;

pub fn run(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let project = super::scan_blocking(root)?;
    let feature = project.require_feature(id)?;

    if json {
        return print_json(feature);
    }

    println!("Feature: {} ({})", feature.name, feature.id);
    println!("Stage:   {}", feature.stage);
    println!(
        "Files:   spec {}  plan {}  tasks {}",
        mark(feature.has_spec),
        mark(feature.has_plan),
        mark(feature.has_tasks)
    );
    println!(
        "Tasks:   {}  ({} in progress)",
        progress(feature.completed_tasks, feature.total_tasks),
        feature.in_progress_tasks
    );
    if feature.has_checklists {
        println!(
            "Checks:  {}",
            progress(feature.completed_checklist_items, feature.total_checklist_items)
        );
    }

    if let Some(tc) = &feature.technical_context {
        println!("\nTechnical context:");
        println!("  language:     {}", tc.language);
        println!("  dependencies: {}", tc.dependencies.join(", "));
        println!("  storage:      {}", tc.storage);
        println!("  testing:      {}", tc.testing);
        println!("  platform:     {}", tc.platform);
    }

    if !feature.user_stories.is_empty() {
        println!("\nUser stories:");
        for story in &feature.user_stories {
            println!(
                "  {} [{}] {} ({} criteria)",
                story.id,
                story.priority,
                story.title,
                story.acceptance_criteria.len()
            );
        }
    }

    match &feature.grouping {
        TaskGrouping::Groups(groups) => {
            for group in groups {
                println!(
                    "\n{} {}",
                    group.story_title,
                    progress(group.completed_count, group.total_count)
                );
                for task in &group.tasks {
                    println!("  [{}] {} {}", mark(task.completed), task.id, task.description);
                }
            }
        }
        TaskGrouping::Phases(phases) => {
            for phase in phases {
                println!("\n{}", phase.name);
                for task in &phase.tasks {
                    println!("  [{}] {} {}", mark(task.completed), task.id, task.description);
                }
            }
        }
        TaskGrouping::Ungrouped => {}
    }

    if feature.total_clarifications > 0 {
        println!("\nClarifications ({}):", feature.total_clarifications);
        for session in &feature.clarification_sessions {
            let date = if session.date.is_empty() { "undated" } else { session.date.as_str() };
            println!("  {date}");
            for c in &session.clarifications {
                println!("    Q: {}", c.question);
                println!("    A: {}", c.answer);
            }
        }
    }

    let extra: Vec<_> = feature.additional_files.iter().filter(|f| f.exists).collect();
    if !extra.is_empty() {
        println!("\nAdditional files:");
        for file in extra {
            println!("  {:<10} {}", file.file_type.as_str(), file.path.display());
        }
    }
    Ok(())
}

fn mark(yes: bool) -> &'static str {
    if yes {
        "x"
    } else {
        " "
    }
}

use crate::checkbox::count_checkboxes;
use crate::io::{list_sorted, read_optional};
use crate::parser::{
    count_clarifications, group_by_story, parse_clarifications, parse_spec_title, parse_tasks,
    parse_technical_context, parse_user_stories, ClarificationSession, ParsedTasks, Task,
    TaskGrouping, TaskPhase, TechnicalContext, UserStory,
};
use crate::paths::{self, is_hidden};
use crate::types::{FeatureStage, SpecKitFileType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SpecKitFile
// ---------------------------------------------------------------------------

/// Handle to an auxiliary feature file (research, contracts, checklists, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecKitFile {
    #[serde(rename = "type")]
    pub file_type: SpecKitFileType,
    pub path: PathBuf,
    pub content: String,
    pub exists: bool,
}

impl SpecKitFile {
    pub async fn load(file_type: SpecKitFileType, path: PathBuf) -> Self {
        let content = read_optional(&path).await;
        Self {
            file_type,
            exists: content.is_some(),
            content: content.unwrap_or_default(),
            path,
        }
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub stage: FeatureStage,
    pub has_spec: bool,
    pub has_plan: bool,
    pub has_tasks: bool,
    pub tasks: Vec<Task>,
    pub phases: Vec<TaskPhase>,
    pub grouping: TaskGrouping,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub clarification_sessions: Vec<ClarificationSession>,
    pub total_clarifications: usize,
    pub user_stories: Vec<UserStory>,
    pub technical_context: Option<TechnicalContext>,
    pub spec_content: Option<String>,
    pub plan_content: Option<String>,
    pub additional_files: Vec<SpecKitFile>,
    pub has_checklists: bool,
    pub total_checklist_items: usize,
    pub completed_checklist_items: usize,
}

impl Feature {
    /// Auxiliary files of one type, in discovery order.
    pub fn files_of(&self, file_type: SpecKitFileType) -> impl Iterator<Item = &SpecKitFile> {
        self.additional_files
            .iter()
            .filter(move |f| f.file_type == file_type)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// The one stage derivation. Evaluated from scratch on every scan; presence
/// means "readable", so an unreadable tasks.md counts as absent.
pub fn derive_stage(has_plan: bool, has_tasks: bool, completed: usize, total: usize) -> FeatureStage {
    if has_tasks {
        if total > 0 && completed == total {
            FeatureStage::Complete
        } else if completed > 0 {
            FeatureStage::Implement
        } else {
            FeatureStage::Tasks
        }
    } else if has_plan {
        FeatureStage::Plan
    } else {
        FeatureStage::Specify
    }
}

/// Incomplete tasks in phases where work has started.
pub fn count_in_progress(phases: &[TaskPhase]) -> usize {
    phases
        .iter()
        .filter(|p| p.tasks.iter().any(|t| t.completed))
        .map(|p| p.tasks.iter().filter(|t| !t.completed).count())
        .sum()
}

/// `001-user-auth` → `User Auth`.
pub fn humanize_id(id: &str) -> String {
    let trimmed = id.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-' || c == '_');
    let words: Vec<String> = trimmed
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        id.to_string()
    } else {
        words.join(" ")
    }
}

// ---------------------------------------------------------------------------
// Auxiliary file discovery
// ---------------------------------------------------------------------------

const FIXED_AUXILIARY: &[SpecKitFileType] = &[
    SpecKitFileType::Research,
    SpecKitFileType::DataModel,
    SpecKitFileType::Quickstart,
];

fn is_checklist_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".md") && (lower.starts_with("checklist") || lower.ends_with("-checklist.md"))
}

async fn load_fixed(dir: &Path) -> Vec<SpecKitFile> {
    let loads = FIXED_AUXILIARY.iter().filter_map(|&t| {
        t.filename()
            .map(|name| SpecKitFile::load(t, dir.join(name)))
    });
    futures::future::join_all(loads).await
}

async fn load_contracts(dir: &Path) -> Vec<SpecKitFile> {
    let contracts = dir.join(paths::CONTRACTS_DIR);
    let names = list_sorted(&contracts, |name, ft| ft.is_file() && !is_hidden(name)).await;
    let loads = names
        .iter()
        .map(|name| SpecKitFile::load(SpecKitFileType::Contract, contracts.join(name)));
    futures::future::join_all(loads).await
}

async fn load_checklists(dir: &Path) -> Vec<SpecKitFile> {
    let checklist_dir = dir.join(paths::CHECKLISTS_DIR);
    let nested = list_sorted(&checklist_dir, |name, ft| {
        ft.is_file() && !is_hidden(name) && name.to_ascii_lowercase().ends_with(".md")
    })
    .await;
    let top_level = list_sorted(dir, |name, ft| ft.is_file() && is_checklist_name(name)).await;

    let loads = nested
        .iter()
        .map(|name| checklist_dir.join(name))
        .chain(top_level.iter().map(|name| dir.join(name)))
        .map(|path| SpecKitFile::load(SpecKitFileType::Checklist, path));
    let mut files = futures::future::join_all(loads).await;
    files.retain(|f| f.exists);
    files
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the Feature record for one feature directory.
///
/// Never fails: unreadable files are treated as absent and unmatched sections
/// degrade to defaults.
pub async fn assemble_feature(dir: &Path) -> Feature {
    let id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (spec_path, plan_path, tasks_path) = (
        dir.join(paths::SPEC_MD),
        dir.join(paths::PLAN_MD),
        dir.join(paths::TASKS_MD),
    );
    let (spec, plan, tasks_md) = tokio::join!(
        read_optional(&spec_path),
        read_optional(&plan_path),
        read_optional(&tasks_path),
    );
    let (fixed, contracts, checklists) =
        tokio::join!(load_fixed(dir), load_contracts(dir), load_checklists(dir));

    let user_stories = spec.as_deref().map(parse_user_stories).unwrap_or_default();
    let clarification_sessions = spec.as_deref().map(parse_clarifications).unwrap_or_default();
    let technical_context = plan.as_deref().and_then(parse_technical_context);
    let ParsedTasks { tasks, phases } = tasks_md.as_deref().map(parse_tasks).unwrap_or_default();

    let groups = group_by_story(&tasks, &user_stories);
    let grouping = TaskGrouping::resolve(&phases, groups);

    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let in_progress_tasks = count_in_progress(&phases);
    let stage = derive_stage(plan.is_some(), tasks_md.is_some(), completed_tasks, total_tasks);

    let (completed_checklist_items, total_checklist_items) = checklists
        .iter()
        .map(|f| count_checkboxes(&f.content))
        .fold((0, 0), |(d, t), (cd, ct)| (d + cd, t + ct));

    let name = spec
        .as_deref()
        .and_then(parse_spec_title)
        .unwrap_or_else(|| humanize_id(&id));

    tracing::debug!(feature = %id, %stage, total_tasks, completed_tasks, "feature assembled");

    Feature {
        id,
        name,
        path: dir.to_path_buf(),
        stage,
        has_spec: spec.is_some(),
        has_plan: plan.is_some(),
        has_tasks: tasks_md.is_some(),
        total_clarifications: count_clarifications(&clarification_sessions),
        clarification_sessions,
        tasks,
        phases,
        grouping,
        total_tasks,
        completed_tasks,
        in_progress_tasks,
        user_stories,
        technical_context,
        spec_content: spec,
        plan_content: plan,
        has_checklists: !checklists.is_empty(),
        total_checklist_items,
        completed_checklist_items,
        additional_files: fixed.into_iter().chain(contracts).chain(checklists).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

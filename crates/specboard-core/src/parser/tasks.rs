use super::markdown::{tokenize, Line};
use super::user_story::UserStory;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Phase name for tasks listed before any heading.
pub const DEFAULT_PHASE: &str = "Tasks";
/// Group title for tasks without a story tag.
pub const UNGROUPED_TITLE: &str = "Other Tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub parallel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPhase {
    pub name: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    /// `None` for the trailing group of untagged tasks.
    pub story_id: Option<String>,
    pub story_title: String,
    pub tasks: Vec<Task>,
    pub completed_count: usize,
    pub total_count: usize,
}

/// How a feature's tasks are presented, decided once at assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum TaskGrouping {
    Groups(Vec<TaskGroup>),
    Phases(Vec<TaskPhase>),
    Ungrouped,
}

impl TaskGrouping {
    /// Story groups win when any task carries a story tag, then phases.
    pub fn resolve(phases: &[TaskPhase], groups: Vec<TaskGroup>) -> Self {
        if groups.iter().any(|g| g.story_id.is_some()) {
            TaskGrouping::Groups(groups)
        } else if !phases.is_empty() {
            TaskGrouping::Phases(phases.to_vec())
        } else {
            TaskGrouping::Ungrouped
        }
    }

    pub fn task_count(&self) -> usize {
        match self {
            TaskGrouping::Groups(groups) => groups.iter().map(|g| g.tasks.len()).sum(),
            TaskGrouping::Phases(phases) => phases.iter().map(|p| p.tasks.len()).sum(),
            TaskGrouping::Ungrouped => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTasks {
    pub tasks: Vec<Task>,
    pub phases: Vec<TaskPhase>,
}

static TASK_RE: OnceLock<Regex> = OnceLock::new();
static STORY_TAG_RE: OnceLock<Regex> = OnceLock::new();
static TRAILING_PATH_RE: OnceLock<Regex> = OnceLock::new();
static TICKED_PATH_RE: OnceLock<Regex> = OnceLock::new();
static IN_PATH_RE: OnceLock<Regex> = OnceLock::new();

fn task_re() -> &'static Regex {
    TASK_RE.get_or_init(|| Regex::new(r"^\[([ xX])\]\s*\**(T\d+)\b\**[:.]?\s*(.*)$").unwrap())
}

fn story_tag_re() -> &'static Regex {
    STORY_TAG_RE.get_or_init(|| Regex::new(r"^(?i:(?:story\s*:?\s*)?)(US\d+)$").unwrap())
}

fn trailing_path_re() -> &'static Regex {
    TRAILING_PATH_RE
        .get_or_init(|| Regex::new(r"\s*\(`?([^()\s`]+)`?\)\s*$").unwrap())
}

fn ticked_path_re() -> &'static Regex {
    TICKED_PATH_RE.get_or_init(|| Regex::new(r"`([^`\s]*[/.][^`\s]*\.[A-Za-z0-9]+)`").unwrap())
}

fn in_path_re() -> &'static Regex {
    IN_PATH_RE.get_or_init(|| {
        Regex::new(r"\bin\s+((?:[\w.-]+/)+[\w.-]+|[\w-]+\.[A-Za-z][A-Za-z0-9]{1,4})\b").unwrap()
    })
}

/// Parse one list-item body (`[x] T003 [P] [US1] Do it (src/a.ts)`).
pub fn parse_task_item(item: &str) -> Option<Task> {
    let caps = task_re().captures(item)?;
    let completed = caps[1].eq_ignore_ascii_case("x");
    let id = caps[2].to_string();
    let mut rest = caps.get(3).map_or("", |m| m.as_str()).trim();

    let mut parallel = false;
    let mut user_story = None;
    while let Some(inner_end) = rest.strip_prefix('[').and_then(|r| r.find(']')) {
        let tag = rest[1..=inner_end].trim();
        if tag.len() > 16 {
            break;
        }
        if tag.eq_ignore_ascii_case("p") {
            parallel = true;
        } else if let Some(c) = story_tag_re().captures(tag) {
            user_story = Some(c[1].to_ascii_uppercase());
        }
        rest = rest[inner_end + 2..].trim_start();
    }

    let (description, file_path) = split_file_path(rest);
    Some(Task {
        id,
        description,
        completed,
        parallel,
        user_story,
        file_path,
    })
}

/// `src/a.ts` and `user.py` qualify; `v1.2`, `1.5x` and `3.md` do not.
fn looks_like_path(candidate: &str) -> bool {
    if candidate.contains('/') {
        return candidate.chars().any(|c| c.is_alphabetic());
    }
    let Some((stem, ext)) = candidate.rsplit_once('.') else {
        return false;
    };
    let ext_ok = ext.len() <= 6
        && ext.starts_with(|c: char| c.is_ascii_alphabetic())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    ext_ok && stem.chars().any(|c| c.is_alphabetic() || c == '_')
}

/// A trailing `(path)` is lifted out of the description; an inline
/// `` `path` `` or `in path` reference is copied but left in place.
fn split_file_path(text: &str) -> (String, Option<String>) {
    if let Some(c) = trailing_path_re().captures(text) {
        if looks_like_path(&c[1]) {
            let whole = c.get(0).map_or(text.len(), |m| m.start());
            return (text[..whole].trim().to_string(), Some(c[1].to_string()));
        }
    }
    let inline = ticked_path_re()
        .captures_iter(text)
        .chain(in_path_re().captures_iter(text))
        .map(|c| c[1].trim_end_matches('.').to_string())
        .find(|candidate| looks_like_path(candidate));
    (text.trim().to_string(), inline)
}

/// Extract tasks from tasks.md content, keeping the flat list and the
/// heading-based phases in sync.
pub fn parse_tasks(content: &str) -> ParsedTasks {
    let mut parsed = ParsedTasks::default();
    let mut phase_name: Option<&str> = None;

    for line in tokenize(content) {
        match line {
            Line::Heading { level, text } if (2..=4).contains(&level) => phase_name = Some(text),
            Line::ListItem { text, .. } => {
                let Some(task) = parse_task_item(text) else {
                    continue;
                };
                let name = phase_name.unwrap_or(DEFAULT_PHASE);
                match parsed.phases.last_mut() {
                    Some(phase) if phase.name == name => phase.tasks.push(task.clone()),
                    _ => parsed.phases.push(TaskPhase {
                        name: name.to_string(),
                        tasks: vec![task.clone()],
                    }),
                }
                parsed.tasks.push(task);
            }
            _ => {}
        }
    }
    parsed
}

/// Group tasks by story tag in order of first appearance, with untagged tasks
/// in a trailing "Other Tasks" group. Titles come from `stories`.
pub fn group_by_story(tasks: &[Task], stories: &[UserStory]) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut other: Vec<Task> = Vec::new();

    for task in tasks {
        let Some(story_id) = task.user_story.as_deref() else {
            other.push(task.clone());
            continue;
        };
        match groups.iter_mut().find(|g| g.story_id.as_deref() == Some(story_id)) {
            Some(group) => group.tasks.push(task.clone()),
            None => {
                let story_title = stories
                    .iter()
                    .find(|s| s.id == story_id)
                    .map_or_else(|| story_id.to_string(), |s| s.title.clone());
                groups.push(TaskGroup {
                    story_id: Some(story_id.to_string()),
                    story_title,
                    tasks: vec![task.clone()],
                    completed_count: 0,
                    total_count: 0,
                });
            }
        }
    }

    if !other.is_empty() {
        groups.push(TaskGroup {
            story_id: None,
            story_title: UNGROUPED_TITLE.to_string(),
            tasks: other,
            completed_count: 0,
            total_count: 0,
        });
    }

    for group in &mut groups {
        group.total_count = group.tasks.len();
        group.completed_count = group.tasks.iter().filter(|t| t.completed).count();
    }
    groups
}

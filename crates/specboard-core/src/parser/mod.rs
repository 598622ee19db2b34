//! Section extractors: one pure function per spec-kit document convention.
//!
//! Every extractor is total. Input that does not follow the convention yields
//! an empty or default value, never an error.

pub mod clarification;
pub mod constitution;
pub mod markdown;
pub mod tasks;
pub mod technical_context;
pub mod user_story;

pub use clarification::{count_clarifications, parse_clarifications, Clarification, ClarificationSession};
pub use constitution::{parse_constitution, Constitution, ConstitutionPrinciple, ConstitutionSection};
pub use tasks::{group_by_story, parse_tasks, ParsedTasks, Task, TaskGroup, TaskGrouping, TaskPhase};
pub use technical_context::{parse_technical_context, TechnicalContext};
pub use user_story::{parse_user_stories, UserStory};

use markdown::{tokenize, Line};

/// Title of a spec document: its first `#` heading with any
/// `Feature Specification:` prefix removed.
pub fn parse_spec_title(content: &str) -> Option<String> {
    tokenize(content).into_iter().find_map(|line| match line {
        Line::Heading { level: 1, text } => {
            let title = match text.split_once(':') {
                Some((prefix, rest)) if prefix.to_ascii_lowercase().contains("specification") => rest,
                _ => text,
            };
            let title = title.trim();
            (!title.is_empty() && !title.starts_with('[')).then(|| title.to_string())
        }
        _ => None,
    })
}

use super::markdown::{tokenize, Line};
use crate::types::Priority;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
}

static STORY_RE: OnceLock<Regex> = OnceLock::new();
static PRIORITY_RE: OnceLock<Regex> = OnceLock::new();

fn story_re() -> &'static Regex {
    STORY_RE.get_or_init(|| {
        Regex::new(r"^(?:(?i:user\s+story)\s+(\d+)|US(\d+))\b\s*[-–—:]?\s*(.*)$").unwrap()
    })
}

fn priority_re() -> &'static Regex {
    PRIORITY_RE.get_or_init(|| {
        Regex::new(r"(?i)\(\s*(?:priority\s*:\s*)?(P[1-3])\s*\)").unwrap()
    })
}

/// Parse a story heading such as `US1 - Login (P1)` or
/// `User Story 2 - Browse catalog (Priority: P2)`.
fn parse_header(text: &str) -> Option<(String, String, Priority)> {
    let caps = story_re().captures(text)?;
    let number = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let rest = caps.get(3).map_or("", |m| m.as_str());

    // Markers after the priority (`🎯 MVP`) are not part of the title.
    let (title, priority) = match priority_re().captures(rest) {
        Some(c) => {
            let start = c.get(0).map_or(rest.len(), |m| m.start());
            (&rest[..start], Priority::parse(&c[1]).unwrap_or(Priority::P3))
        }
        None => (rest, Priority::P3),
    };
    let title = title
        .trim()
        .trim_matches(|c: char| matches!(c, '-' | '–' | '—' | ':'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    Some((format!("US{number}"), title, priority))
}

/// Lines like `**Why this priority**: …` annotate a story; they are not prose.
fn is_annotation(text: &str) -> bool {
    text.starts_with("**") && (text.contains("**:") || text.contains(":**"))
}

/// Extract user stories from spec.md content. Unmatched input yields an
/// empty list.
pub fn parse_user_stories(content: &str) -> Vec<UserStory> {
    let mut stories = Vec::new();
    let mut current: Option<(usize, UserStory, Vec<&str>)> = None;

    for line in tokenize(content) {
        if let Line::Heading { level, text } = line {
            let closes = current.as_ref().is_some_and(|(open, _, _)| level <= *open);
            if closes {
                stories.extend(current.take().map(finish));
            }
            if let Some((id, title, priority)) = parse_header(text).filter(|_| (2..=4).contains(&level)) {
                stories.extend(current.take().map(finish));
                let story = UserStory {
                    id,
                    title,
                    priority,
                    description: String::new(),
                    acceptance_criteria: Vec::new(),
                };
                current = Some((level, story, Vec::new()));
            }
            continue;
        }

        let Some((_, story, prose)) = current.as_mut() else {
            continue;
        };
        match line {
            Line::ListItem { text, .. } => story.acceptance_criteria.push(text.to_string()),
            Line::Text(text) if !is_annotation(text) => prose.push(text),
            _ => {}
        }
    }
    stories.extend(current.take().map(finish));
    stories
}

fn finish((_, mut story, prose): (usize, UserStory, Vec<&str>)) -> UserStory {
    story.description = prose.join("\n");
    story
}

use super::markdown::{label_value, strip_emphasis, tokenize, Line};
use serde::{Deserialize, Serialize};

/// Fields read from the "Technical Context" section of plan.md. Absent fields
/// are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalContext {
    pub language: String,
    pub dependencies: Vec<String>,
    pub storage: String,
    pub testing: String,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Language,
    Dependencies,
    Storage,
    Testing,
    Platform,
}

fn field_for(label: &str) -> Option<Field> {
    match label.to_ascii_lowercase().as_str() {
        "language/version" | "language" | "language & version" => Some(Field::Language),
        "primary dependencies" | "dependencies" => Some(Field::Dependencies),
        "storage" => Some(Field::Storage),
        "testing" => Some(Field::Testing),
        "target platform" | "platform" => Some(Field::Platform),
        _ => None,
    }
}

impl TechnicalContext {
    fn set(&mut self, field: Field, value: &str) {
        let value = strip_emphasis(value).trim().to_string();
        match field {
            Field::Language => self.language = value,
            Field::Dependencies => {
                self.dependencies = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            Field::Storage => self.storage = value,
            Field::Testing => self.testing = value,
            Field::Platform => self.platform = value,
        }
    }
}

/// Extract the technical context from plan.md content.
///
/// Labels are read inside a "Technical Context" heading when one exists,
/// otherwise anywhere in the document. `None` when neither the section nor
/// any known label is present.
pub fn parse_technical_context(content: &str) -> Option<TechnicalContext> {
    let lines = tokenize(content);
    let section = lines.iter().enumerate().find_map(|(i, l)| match *l {
        Line::Heading { level, text } if text.to_ascii_lowercase().contains("technical context") => {
            Some((i, level))
        }
        _ => None,
    });

    let body: &[Line] = match section {
        Some((start, level)) => {
            let end = lines[start + 1..]
                .iter()
                .position(|l| matches!(*l, Line::Heading { level: inner, .. } if inner <= level))
                .map_or(lines.len(), |i| start + 1 + i);
            &lines[start + 1..end]
        }
        None => &lines[..],
    };

    let mut ctx = TechnicalContext::default();
    let mut found = section.is_some();
    let mut pending: Option<Field> = None;

    for line in body {
        let text = match *line {
            Line::Text(t) | Line::ListItem { text: t, .. } => t,
            Line::Blank => continue,
            _ => {
                pending = None;
                continue;
            }
        };

        if let Some((label, value)) = label_value(text) {
            if let Some(field) = field_for(label) {
                found = true;
                if value.is_empty() {
                    pending = Some(field);
                } else {
                    ctx.set(field, value);
                    pending = None;
                }
                continue;
            }
        }
        if let Some(field) = pending.take() {
            ctx.set(field, text);
        }
    }

    found.then_some(ctx)
}

use super::markdown::{strip_emphasis, tokenize, Line};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstitutionPrinciple {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstitutionSection {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constitution {
    pub raw_content: String,
    pub principles: Vec<ConstitutionPrinciple>,
    pub sections: Vec<ConstitutionSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_amended_date: Option<String>,
}

static NUMBERED_RE: OnceLock<Regex> = OnceLock::new();
static VERSION_RE: OnceLock<Regex> = OnceLock::new();
static RATIFIED_RE: OnceLock<Regex> = OnceLock::new();
static AMENDED_RE: OnceLock<Regex> = OnceLock::new();

fn numbered_re() -> &'static Regex {
    NUMBERED_RE.get_or_init(|| {
        Regex::new(r"^(?:[IVXLC]+\.|(?i:principle)\s+[\dIVXLC]+\s*[:.\-–—]?)\s*(.+)$").unwrap()
    })
}

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(r"(?i)(?:^|[\s|])version\s*:\s*([^\s|]+)").unwrap())
}

fn ratified_re() -> &'static Regex {
    RATIFIED_RE
        .get_or_init(|| Regex::new(r"(?i)(?:^|[\s|])ratified(?:\s+date)?\s*:\s*([^\s|]+)").unwrap())
}

fn amended_re() -> &'static Regex {
    AMENDED_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[\s|])last\s+amended(?:\s+date)?\s*:\s*([^\s|]+)").unwrap()
    })
}

/// Raw lines from `start` up to the next heading at `level` or shallower.
fn block(raw: &[&str], lines: &[Line], start: usize, level: usize) -> String {
    let end = lines[start..]
        .iter()
        .position(|l| matches!(*l, Line::Heading { level: inner, .. } if inner <= level))
        .map_or(lines.len(), |i| start + i);
    raw[start..end].join("\n").trim().to_string()
}

fn first_capture(re: &Regex, content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        re.captures(&strip_emphasis(line))
            .map(|c| c[1].trim_end_matches(['.', ','].as_slice()).to_string())
    })
}

/// Split a constitution into `##` sections and pick out its principles.
pub fn parse_constitution(content: &str) -> Constitution {
    let raw: Vec<&str> = content.lines().collect();
    let lines = tokenize(content);

    let mut sections = Vec::new();
    let mut principles = Vec::new();
    let mut in_principles_section = false;

    for (i, line) in lines.iter().enumerate() {
        let Line::Heading { level, text } = *line else {
            continue;
        };
        if level <= 2 {
            in_principles_section = level == 2 && text.to_ascii_lowercase().contains("principle");
        }
        if level == 2 {
            sections.push(ConstitutionSection {
                name: text.to_string(),
                content: block(&raw, &lines, i + 1, 2),
            });
        }

        let numbered = numbered_re().captures(text).map(|c| c[1].trim().to_string());
        let is_principle = level >= 2 && (numbered.is_some() || (level >= 3 && in_principles_section));
        if is_principle {
            principles.push(ConstitutionPrinciple {
                name: numbered.unwrap_or_else(|| text.to_string()),
                description: block(&raw, &lines, i + 1, level),
            });
        }
    }

    Constitution {
        raw_content: content.to_string(),
        principles,
        sections,
        version: first_capture(version_re(), content),
        ratified_date: first_capture(ratified_re(), content),
        last_amended_date: first_capture(amended_re(), content),
    }
}

//! Minimal line tokenizer shared by the extractors.
//!
//! Only the structure the extractors care about is recognised. Everything
//! else is `Text`, and lines inside fenced code blocks are `Code` so that a
//! `#` comment in a snippet never opens a section.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: usize, text: &'a str },
    ListItem { indent: usize, text: &'a str },
    Rule,
    Blank,
    Code(&'a str),
    Text(&'a str),
}

pub fn tokenize(content: &str) -> Vec<Line<'_>> {
    let mut in_fence = false;
    content
        .lines()
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                return Line::Code(raw);
            }
            if in_fence {
                return Line::Code(raw);
            }
            classify(raw)
        })
        .collect()
}

fn classify(raw: &str) -> Line<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some((level, text)) = heading(trimmed) {
        return Line::Heading { level, text };
    }
    if is_rule(trimmed) {
        return Line::Rule;
    }
    if let Some(text) = list_item(trimmed) {
        let indent = raw.len() - raw.trim_start().len();
        return Line::ListItem { indent, text };
    }
    Line::Text(trimmed)
}

/// `## Title ##` → `(2, "Title")`.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some((level, text))
}

/// Text of a bullet (`-`, `*`, `+`) or ordered (`1.`, `1)`) list item.
pub fn list_item(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let first = line.chars().next()?;
    let body = if matches!(first, '-' | '*' | '+') {
        &line[1..]
    } else if first.is_ascii_digit() {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        let after = &line[digits..];
        after.strip_prefix('.').or_else(|| after.strip_prefix(')'))?
    } else {
        return None;
    };
    if !body.starts_with(char::is_whitespace) {
        return None;
    }
    let text = body.trim();
    (!text.is_empty()).then_some(text)
}

fn is_rule(line: &str) -> bool {
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|&c| c == compact[0])
}

/// Split `**Label**: value` (bold, colon placement and list prefix all
/// optional) into `("Label", "value")`.
pub fn label_value(line: &str) -> Option<(&str, &str)> {
    let line = list_item(line).unwrap_or(line.trim());
    let colon = line.find(':')?;
    let label = line[..colon].trim().trim_matches(is_emphasis).trim();
    if label.is_empty() || label.len() > 48 || label.contains(|c| c == '*' || c == '`') {
        return None;
    }
    let value = line[colon + 1..].trim_start_matches(is_emphasis).trim();
    Some((label, value))
}

fn is_emphasis(c: char) -> bool {
    c == '*' || c == '_'
}

/// Remove `**bold**` / `__bold__` markers.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

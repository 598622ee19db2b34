//! Line-oriented checkbox mutation for markdown checklists.
//!
//! Only the state character between the brackets is ever rewritten; leading
//! whitespace, the marker and the trailing text are preserved byte for byte.

use crate::error::Result;
use crate::io::atomic_write;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

static CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();

fn checkbox_re() -> &'static Regex {
    CHECKBOX_RE.get_or_init(|| Regex::new(r"^(\s*-\s*\[)([ xX])(\]\s*.*)$").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("line index {index} is out of bounds (0-{last})", last = .lines.saturating_sub(1))]
    OutOfBounds { index: i64, lines: usize },

    #[error("line {index} is not a valid checkbox line")]
    NotACheckbox { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    pub content: String,
    pub new_state: bool,
}

/// Result of a toggle request against a file, shaped for callers that must
/// never see a thrown error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub success: bool,
    pub new_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn is_valid_checkbox_line(line: &str) -> bool {
    checkbox_re().is_match(line)
}

/// `Some(true)` for `x`/`X`, `Some(false)` for a space, `None` for non-checkbox lines.
pub fn checkbox_state(line: &str) -> Option<bool> {
    checkbox_re()
        .captures(line)
        .map(|c| c[2].eq_ignore_ascii_case("x"))
}

/// Flip the state character. Non-checkbox lines are returned unchanged.
pub fn toggle_checkbox_line(line: &str) -> String {
    match checkbox_re().captures(line) {
        Some(c) => {
            let next = if c[2].eq_ignore_ascii_case("x") { " " } else { "x" };
            format!("{}{}{}", &c[1], next, &c[3])
        }
        None => line.to_string(),
    }
}

/// Toggle the checkbox on zero-based `line_index` of `content`. Every other
/// line is left byte-identical; lines are split on `\n` only.
pub fn toggle_checkbox_in_content(
    content: &str,
    line_index: i64,
) -> std::result::Result<Toggled, ToggleError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let index = usize::try_from(line_index)
        .ok()
        .filter(|&i| i < lines.len())
        .ok_or(ToggleError::OutOfBounds {
            index: line_index,
            lines: lines.len(),
        })?;

    let line = lines[index];
    if !is_valid_checkbox_line(line) {
        return Err(ToggleError::NotACheckbox { index });
    }

    let toggled = toggle_checkbox_line(line);
    let new_state = checkbox_state(&toggled).unwrap_or(false);
    let content = lines
        .iter()
        .enumerate()
        .map(|(i, l)| if i == index { toggled.as_str() } else { l })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Toggled { content, new_state })
}

/// Count `(completed, total)` checkbox lines in `content`.
pub fn count_checkboxes(content: &str) -> (usize, usize) {
    content
        .split('\n')
        .filter_map(checkbox_state)
        .fold((0, 0), |(done, total), checked| {
            (done + usize::from(checked), total + 1)
        })
}

/// Read `path`, toggle `line_index`, and write the whole file back when the
/// toggle succeeded. Only I/O failures surface as `Err`; toggle failures are
/// reported in the outcome and leave the file untouched.
pub fn toggle_file(path: &Path, line_index: i64) -> Result<ToggleOutcome> {
    let content = std::fs::read_to_string(path)?;
    match toggle_checkbox_in_content(&content, line_index) {
        Ok(toggled) => {
            atomic_write(path, toggled.content.as_bytes())?;
            tracing::debug!(path = %path.display(), line_index, state = toggled.new_state, "checkbox toggled");
            Ok(ToggleOutcome {
                success: true,
                new_state: Some(toggled.new_state),
                error: None,
            })
        }
        Err(e) => Ok(ToggleOutcome {
            success: false,
            new_state: None,
            error: Some(e.to_string()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognises_checkbox_lines() {
        for line in ["- [ ] item", "- [x] item", "- [X] item", "  - [ ] indented", "-[ ]tight"] {
            assert!(is_valid_checkbox_line(line), "expected checkbox: {line:?}");
        }
        for line in ["- Regular item", "## Section", "", "Some text", "* [ ] star bullet", "- [~] item"] {
            assert!(!is_valid_checkbox_line(line), "expected non-checkbox: {line:?}");
        }
    }

    #[test]
    fn reads_state() {
        assert_eq!(checkbox_state("- [ ] a"), Some(false));
        assert_eq!(checkbox_state("- [x] a"), Some(true));
        assert_eq!(checkbox_state("- [X] a"), Some(true));
        assert_eq!(checkbox_state("- a"), None);
    }

    #[test]
    fn toggle_line_flips_only_state_char() {
        assert_eq!(toggle_checkbox_line("- [ ] Task item"), "- [x] Task item");
        assert_eq!(toggle_checkbox_line("- [X] Task item"), "- [ ] Task item");
        assert_eq!(toggle_checkbox_line("    -  [ ]   spaced  "), "    -  [x]   spaced  ");
        assert_eq!(toggle_checkbox_line("## heading"), "## heading");
    }

    #[test]
    fn double_toggle_restores_line() {
        for line in ["- [ ] a", "\t- [x] b with `code`", "  - [ ] CHK001 trailing  "] {
            assert_eq!(toggle_checkbox_line(&toggle_checkbox_line(line)), line);
        }
        // Uppercase normalises to lowercase on the way back; state is preserved.
        let back = toggle_checkbox_line(&toggle_checkbox_line("- [X] c"));
        assert_eq!(checkbox_state(&back), Some(true));
    }

    #[test]
    fn toggle_in_content_touches_one_line() {
        let content = "# Checklist\n\n- [ ] first\n- [x] second\r\n- [ ] third";
        let out = toggle_checkbox_in_content(content, 2).unwrap();
        assert!(out.new_state);
        assert_eq!(out.content, "# Checklist\n\n- [x] first\n- [x] second\r\n- [ ] third");

        let back = toggle_checkbox_in_content(&out.content, 2).unwrap();
        assert!(!back.new_state);
        assert_eq!(back.content, content);
    }

    #[test]
    fn out_of_bounds_indices_fail() {
        let content = "- [ ] a\n- [ ] b";
        assert_eq!(
            toggle_checkbox_in_content(content, -1),
            Err(ToggleError::OutOfBounds { index: -1, lines: 2 })
        );
        assert_eq!(
            toggle_checkbox_in_content(content, 2),
            Err(ToggleError::OutOfBounds { index: 2, lines: 2 })
        );
        let msg = toggle_checkbox_in_content(content, 5).unwrap_err().to_string();
        assert!(msg.contains("out of bounds (0-1)"), "{msg}");
    }

    #[test]
    fn non_checkbox_targets_fail() {
        let content = "## Heading\n- plain bullet\n- [ ] real";
        assert_eq!(
            toggle_checkbox_in_content(content, 0),
            Err(ToggleError::NotACheckbox { index: 0 })
        );
        assert_eq!(
            toggle_checkbox_in_content(content, 1),
            Err(ToggleError::NotACheckbox { index: 1 })
        );
    }

    #[test]
    fn counts_checkboxes() {
        assert_eq!(count_checkboxes("- [x] a\n- [ ] b\n- [X] c\ntext"), (2, 3));
        assert_eq!(count_checkboxes(""), (0, 0));
    }

    #[test]
    fn toggle_file_writes_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ux.md");
        std::fs::write(&path, "# UX\n- [ ] contrast\n").unwrap();

        let outcome = toggle_file(&path, 1).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.new_state, Some(true));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# UX\n- [x] contrast\n");

        let failed = toggle_file(&path, 0).unwrap();
        assert!(!failed.success);
        assert!(failed.error.unwrap().contains("not a valid checkbox"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# UX\n- [x] contrast\n");
    }

    #[test]
    fn toggle_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(toggle_file(&dir.path().join("nope.md"), 0).is_err());
    }
}

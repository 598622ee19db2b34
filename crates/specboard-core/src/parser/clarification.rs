use super::markdown::{strip_emphasis, tokenize, Line};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationSession {
    /// `YYYY-MM-DD`, or empty for pairs recorded before any session heading.
    pub date: String,
    pub clarifications: Vec<Clarification>,
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_RE: OnceLock<Regex> = OnceLock::new();
static QUESTION_RE: OnceLock<Regex> = OnceLock::new();
static ANSWER_RE: OnceLock<Regex> = OnceLock::new();

fn date_re() -> &'static Regex {
    DATE_RE.get_or_init(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap())
}

fn inline_re() -> &'static Regex {
    INLINE_RE.get_or_init(|| {
        Regex::new(r"^Q\d*\s*:\s*(.+?)\s*(?:→|->|=>)\s*A\d*\s*:\s*(.*)$").unwrap()
    })
}

fn question_re() -> &'static Regex {
    QUESTION_RE.get_or_init(|| Regex::new(r"^Q\d*\s*:\s*(.+)$").unwrap())
}

fn answer_re() -> &'static Regex {
    ANSWER_RE.get_or_init(|| Regex::new(r"^A\d*\s*:\s*(.*)$").unwrap())
}

#[derive(Default)]
struct Collector {
    sessions: Vec<ClarificationSession>,
    question: Option<String>,
}

impl Collector {
    fn open(&mut self, date: &str) {
        self.flush_question();
        self.sessions.push(ClarificationSession {
            date: date.to_string(),
            clarifications: Vec::new(),
        });
    }

    fn push(&mut self, question: String, answer: String) {
        if self.sessions.is_empty() {
            self.open("");
        }
        if let Some(session) = self.sessions.last_mut() {
            session.clarifications.push(Clarification { question, answer });
        }
    }

    /// An unanswered question is kept with an empty answer.
    fn flush_question(&mut self) {
        if let Some(q) = self.question.take() {
            self.push(q, String::new());
        }
    }

    fn line(&mut self, text: &str) {
        let text = strip_emphasis(text);
        let text = text.trim();
        if let Some(c) = inline_re().captures(text) {
            self.flush_question();
            self.push(c[1].trim().to_string(), c[2].trim().to_string());
        } else if let Some(c) = question_re().captures(text) {
            self.flush_question();
            self.question = Some(c[1].trim().to_string());
        } else if let Some(c) = answer_re().captures(text) {
            if let Some(q) = self.question.take() {
                self.push(q, c[1].trim().to_string());
            }
        }
    }

    fn finish(mut self) -> Vec<ClarificationSession> {
        self.flush_question();
        self.sessions.retain(|s| !s.clarifications.is_empty());
        self.sessions
    }
}

/// Extract dated Q/A sessions from the "Clarifications" section of spec.md,
/// in document order.
pub fn parse_clarifications(content: &str) -> Vec<ClarificationSession> {
    let mut collector = Collector::default();
    let mut section_level: Option<usize> = None;

    for line in tokenize(content) {
        match (line, section_level) {
            (Line::Heading { level, text }, None) => {
                if text.to_ascii_lowercase().contains("clarification") {
                    section_level = Some(level);
                }
            }
            (Line::Heading { level, .. }, Some(open)) if level <= open => {
                section_level = None;
                collector.flush_question();
            }
            (Line::Heading { text, .. }, Some(_)) => {
                if let Some(c) = date_re().captures(text) {
                    collector.open(&c[1]);
                }
            }
            (Line::ListItem { text, .. } | Line::Text(text), Some(_)) => collector.line(text),
            _ => {}
        }
    }
    collector.finish()
}

/// Total number of Q/A pairs across sessions.
pub fn count_clarifications(sessions: &[ClarificationSession]) -> usize {
    sessions.iter().map(|s| s.clarifications.len()).sum()
}

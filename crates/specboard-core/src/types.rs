use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FeatureStage
// ---------------------------------------------------------------------------

/// Workflow position of a feature. Always derived from file presence and task
/// completion, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStage {
    Specify,
    Plan,
    Tasks,
    Implement,
    Complete,
}

impl FeatureStage {
    pub fn all() -> &'static [FeatureStage] {
        &[
            FeatureStage::Specify,
            FeatureStage::Plan,
            FeatureStage::Tasks,
            FeatureStage::Implement,
            FeatureStage::Complete,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStage::Specify => "specify",
            FeatureStage::Plan => "plan",
            FeatureStage::Tasks => "tasks",
            FeatureStage::Implement => "implement",
            FeatureStage::Complete => "complete",
        }
    }
}

impl fmt::Display for FeatureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// User story priority. `P1` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    /// Parse `P1`..`P3` (case-insensitive). Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            "P3" => Some(Priority::P3),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SpecKitFileType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecKitFileType {
    Spec,
    Plan,
    Tasks,
    Research,
    DataModel,
    Quickstart,
    Contract,
    Checklist,
}

impl SpecKitFileType {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecKitFileType::Spec => "spec",
            SpecKitFileType::Plan => "plan",
            SpecKitFileType::Tasks => "tasks",
            SpecKitFileType::Research => "research",
            SpecKitFileType::DataModel => "data-model",
            SpecKitFileType::Quickstart => "quickstart",
            SpecKitFileType::Contract => "contract",
            SpecKitFileType::Checklist => "checklist",
        }
    }

    /// Fixed filename for single-file types; `None` for directory-discovered types.
    pub fn filename(self) -> Option<&'static str> {
        match self {
            SpecKitFileType::Spec => Some("spec.md"),
            SpecKitFileType::Plan => Some("plan.md"),
            SpecKitFileType::Tasks => Some("tasks.md"),
            SpecKitFileType::Research => Some("research.md"),
            SpecKitFileType::DataModel => Some("data-model.md"),
            SpecKitFileType::Quickstart => Some("quickstart.md"),
            SpecKitFileType::Contract | SpecKitFileType::Checklist => None,
        }
    }
}

impl fmt::Display for SpecKitFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

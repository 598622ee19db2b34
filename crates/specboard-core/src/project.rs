use crate::error::{Result, SpecboardError};
use crate::feature::{assemble_feature, Feature};
use crate::io::{list_sorted, read_optional};
use crate::parser::{parse_constitution, Constitution};
use crate::paths::{self, is_hidden, is_spec_kit_project};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of a spec-kit project. Rebuilt wholesale on every scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub path: PathBuf,
    pub name: String,
    pub features: Vec<Feature>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub constitution: Option<Constitution>,
    pub has_constitution: bool,
}

impl Project {
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn require_feature(&self, id: &str) -> Result<&Feature> {
        self.feature(id)
            .ok_or_else(|| SpecboardError::FeatureNotFound(id.to_string()))
    }
}

async fn load_constitution(root: &Path) -> Option<Constitution> {
    for candidate in paths::CONSTITUTION_CANDIDATES {
        if let Some(text) = read_optional(&root.join(candidate)).await {
            return Some(parse_constitution(&text));
        }
    }
    None
}

/// Scan `root`, failing with [`SpecboardError::NotAProject`] when it lacks
/// both project markers.
pub async fn try_scan(root: &Path) -> Result<Project> {
    if !is_spec_kit_project(root) {
        return Err(SpecboardError::NotAProject(root.to_path_buf()));
    }

    let feature_dirs: Vec<PathBuf> = match paths::features_dir(root) {
        Some(dir) => list_sorted(&dir, |name, ft| ft.is_dir() && !is_hidden(name))
            .await
            .into_iter()
            .map(|name| dir.join(name))
            .collect(),
        None => Vec::new(),
    };

    // join_all yields results in input order regardless of completion order.
    let (features, constitution) = tokio::join!(
        futures::future::join_all(feature_dirs.iter().map(|d| assemble_feature(d))),
        load_constitution(root),
    );

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    tracing::debug!(root = %root.display(), features = features.len(), "project scanned");

    Ok(Project {
        path: root.to_path_buf(),
        name,
        features,
        last_updated: Utc::now(),
        has_constitution: constitution.is_some(),
        constitution,
    })
}

/// Scan `root`, returning `None` when it is not a spec-kit project.
pub async fn scan_project(root: &Path) -> Option<Project> {
    match try_scan(root).await {
        Ok(project) => Some(project),
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "no project data");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureStage;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn not_a_project_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(scan_project(dir.path()).await.is_none());
        assert!(matches!(
            try_scan(dir.path()).await,
            Err(SpecboardError::NotAProject(_))
        ));
    }

    #[tokio::test]
    async fn features_are_name_sorted_and_hidden_dirs_skipped() {
        let dir = TempDir::new().unwrap();
        for id in ["003-c", "001-a", "002-b"] {
            write(dir.path(), &format!("specs/{id}/spec.md"), "# Spec");
        }
        write(dir.path(), "specs/.scratch/spec.md", "# Hidden");
        write(dir.path(), "specs/README.md", "not a feature");

        let project = scan_project(dir.path()).await.unwrap();
        let ids: Vec<_> = project.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["001-a", "002-b", "003-c"]);
        assert!(!project.has_constitution);
        assert!(project.feature("002-b").is_some());
        assert!(project.require_feature("999-x").is_err());
    }

    #[tokio::test]
    async fn specify_dir_layout_and_constitution() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".specify/specs/001-a/plan.md", "# Plan");
        write(
            dir.path(),
            ".specify/memory/constitution.md",
            "# Constitution\n\n### I. Library-First\nEvery feature starts as a library.\n",
        );

        let project = scan_project(dir.path()).await.unwrap();
        assert_eq!(project.features.len(), 1);
        assert_eq!(project.features[0].stage, FeatureStage::Plan);
        assert!(project.has_constitution);
        assert!(project.constitution.is_some());
    }

    #[tokio::test]
    async fn unreadable_tasks_file_does_not_abort_scan() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "specs/001-ok/tasks.md", "- [x] T001 Done\n");
        write(dir.path(), "specs/002-bad/spec.md", "# Spec");
        std::fs::write(dir.path().join("specs/002-bad/tasks.md"), [0xff, 0xfe, 0x00]).unwrap();

        let project = scan_project(dir.path()).await.unwrap();
        assert_eq!(project.features.len(), 2);
        assert_eq!(project.features[0].stage, FeatureStage::Complete);
        assert!(!project.features[1].has_tasks);
        assert!(project.features[1].tasks.is_empty());
    }

    #[tokio::test]
    async fn specs_marker_without_features_is_empty_project() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        let project = scan_project(dir.path()).await.unwrap();
        assert!(project.features.is_empty());
    }
}

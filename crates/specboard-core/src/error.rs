use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecboardError {
    #[error("not a spec-kit project (no specs/ or .specify/ directory): {}", .0.display())]
    NotAProject(PathBuf),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("access denied: {0} is outside allowed directories")]
    PathNotAllowed(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpecboardError>;

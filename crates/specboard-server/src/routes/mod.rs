pub mod checklist;
pub mod metrics;
pub mod project;
pub mod recent;
pub mod watch;

use serde::Deserialize;

/// `?path=` query shared by every project-scoped route.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

use specboard_core::config::Config;
use specboard_core::paths::ensure_path_safe;
use specboard_core::recent::{RecentProjects, RecentStore};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recent: Arc<Mutex<RecentProjects>>,
}

impl AppState {
    pub fn new(config: Config, store: Box<dyn RecentStore>) -> Self {
        let recent = RecentProjects::open(store, config.recent_limit);
        Self {
            config: Arc::new(config),
            recent: Arc::new(Mutex::new(recent)),
        }
    }

    /// Resolve a client-supplied path, rejecting anything outside the allowed roots.
    pub fn gate(&self, requested: &str) -> specboard_core::Result<PathBuf> {
        ensure_path_safe(requested, &self.config.allowed_roots)
    }
}

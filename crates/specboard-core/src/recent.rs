use crate::config::{Config, RECENT_FILE};
use crate::error::Result;
use crate::io::atomic_write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistence for the recent-projects list.
pub trait RecentStore: Send + Sync {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, paths: &[String]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// `~/.specboard/recent.json`, a JSON array of paths.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::dir()?.join(RECENT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, paths: &[String]) -> Result<()> {
        let data = serde_json::to_vec_pretty(paths)?;
        atomic_write(&self.path, &data)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    paths: Mutex<Vec<String>>,
}

impl RecentStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.paths.lock().map(|p| p.clone()).unwrap_or_default())
    }

    fn save(&self, paths: &[String]) -> Result<()> {
        if let Ok(mut guard) = self.paths.lock() {
            *guard = paths.to_vec();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecentProjects
// ---------------------------------------------------------------------------

/// Most-recent-first list of opened project paths, de-duplicated and capped.
pub struct RecentProjects {
    store: Box<dyn RecentStore>,
    limit: usize,
    paths: Vec<String>,
}

impl RecentProjects {
    /// Load from `store`. An unreadable store starts empty.
    pub fn open(store: Box<dyn RecentStore>, limit: usize) -> Self {
        let mut paths = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "recent projects unreadable, starting empty");
            Vec::new()
        });
        paths.truncate(limit);
        Self { store, limit, paths }
    }

    pub fn list(&self) -> &[String] {
        &self.paths
    }

    /// Move `path` to the front and persist.
    pub fn add(&mut self, path: &str) -> Result<()> {
        self.paths.retain(|p| p != path);
        self.paths.insert(0, path.to_string());
        self.paths.truncate(self.limit);
        self.store.save(&self.paths)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.paths.clear();
        self.store.save(&self.paths)
    }
}

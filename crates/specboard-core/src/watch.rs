//! Change pipeline: poll the project tree, debounce bursts, re-scan, emit.
//!
//! One [`Subscription`] owns two tasks. The poll task fingerprints the tree
//! on a fixed interval and sends a notification whenever anything differs.
//! The driver task owns the single debounce deadline and runs scans inline,
//! so scans for one root never overlap and events leave in trigger order.

use crate::config::Config;
use crate::paths::{self, is_hidden};
use crate::project::{try_scan, Project};
use futures::Stream;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, SystemTime};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use walkdir::WalkDir;

const EVENT_BUFFER: usize = 16;
const CHANGE_BUFFER: usize = 16;

// ---------------------------------------------------------------------------
// Options and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Quiet window after the last change before a re-scan fires.
    pub debounce: Duration,
    pub poll_interval: Duration,
    /// Directory levels below the features directory that are watched.
    pub depth: usize,
}

impl WatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            poll_interval: config.poll_interval(),
            depth: config.watch_depth,
        }
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Message pushed to subscribers: `{"type":"update","data":<Project>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum UpdateEvent {
    Update(Project),
}

impl UpdateEvent {
    pub fn project(&self) -> &Project {
        match self {
            UpdateEvent::Update(project) => project,
        }
    }
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
    /// Skipped when size or mtime already moved.
    digest: Option<Vec<u8>>,
}

impl Fingerprint {
    fn differs_from(&self, older: &Fingerprint) -> bool {
        if self.len != older.len || self.modified != older.modified {
            return true;
        }
        match (&self.digest, &older.digest) {
            (Some(new), Some(old)) => new != old,
            _ => false,
        }
    }
}

/// Files a scan reads: the feature tree down to `depth` levels plus the
/// constitution candidates. Hidden entries below the feature root are pruned.
fn watched_files(root: &Path, depth: usize) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = paths::CONSTITUTION_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .filter(|path| path.is_file())
        .collect();

    if let Some(features) = paths::features_dir(root) {
        let walker = WalkDir::new(features)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));
        found.extend(
            walker
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path()),
        );
    }
    found
}

/// Content fingerprints of the files a scan depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<PathBuf, Fingerprint>,
}

impl Snapshot {
    /// Fingerprint every watched file under `root`. Files that vanish or
    /// cannot be read mid-walk are left out.
    pub fn take(root: &Path, depth: usize) -> Self {
        Self::default().refresh(root, depth)
    }

    /// Re-fingerprint against `self`. A file whose size or mtime moved is
    /// recorded without reading it; the rest are hashed to catch same-size
    /// edits inside one mtime tick.
    pub fn refresh(&self, root: &Path, depth: usize) -> Self {
        let mut files = BTreeMap::new();
        for path in watched_files(root, depth) {
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            let len = meta.len();
            let modified = meta.modified().ok();
            let stat_moved = self
                .files
                .get(&path)
                .is_some_and(|old| old.len != len || old.modified != modified);
            let digest = if stat_moved {
                None
            } else {
                let Ok(bytes) = std::fs::read(&path) else {
                    continue;
                };
                Some(Sha256::digest(&bytes).to_vec())
            };
            files.insert(
                path,
                Fingerprint {
                    len,
                    modified,
                    digest,
                },
            );
        }
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths added, removed or modified between `self` and `newer`.
    pub fn changed_paths(&self, newer: &Snapshot) -> Vec<PathBuf> {
        let modified_or_added = newer
            .files
            .iter()
            .filter(|(path, fp)| self.files.get(*path).map_or(true, |old| fp.differs_from(old)))
            .map(|(path, _)| path.clone());
        let removed = self
            .files
            .keys()
            .filter(|path| !newer.files.contains_key(*path))
            .cloned();
        modified_or_added.chain(removed).collect()
    }
}

/// Blocking poller; call [`Poller::poll`] from a blocking context.
pub struct Poller {
    root: PathBuf,
    depth: usize,
    last: Snapshot,
}

impl Poller {
    pub fn new(root: &Path, depth: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            depth,
            last: Snapshot::take(root, depth),
        }
    }

    /// Re-fingerprint the tree and return what changed since the last poll.
    pub fn poll(&mut self) -> Vec<PathBuf> {
        let next = self.last.refresh(&self.root, self.depth);
        let changed = self.last.changed_paths(&next);
        self.last = next;
        changed
    }
}

async fn poll_loop(
    mut poller: Poller,
    interval: Duration,
    changes: mpsc::Sender<()>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        let polled = tokio::task::spawn_blocking(move || {
            let changed = poller.poll();
            (poller, changed)
        })
        .await;
        let changed = match polled {
            Ok((p, changed)) => {
                poller = p;
                changed
            }
            Err(e) => {
                tracing::warn!(error = %e, "poller task failed, stopping watch");
                break;
            }
        };
        if changed.is_empty() {
            continue;
        }
        tracing::debug!(count = changed.len(), first = %changed[0].display(), "change detected");
        // A full buffer already guarantees a pending re-scan.
        if let Err(mpsc::error::TrySendError::Closed(())) = changes.try_send(()) {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Call `fire` once per burst of notifications on `changes`.
///
/// Every notification pushes the single deadline out to `now + window`.
/// `fire` is awaited inline, so notifications that arrive while it runs
/// start a fresh window only after it returns. Exits on shutdown, or once
/// `changes` is closed and no deadline is pending.
pub async fn run_debounced<F, Fut>(
    mut changes: mpsc::Receiver<()>,
    window: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut fire: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut deadline: Option<Instant> = None;
    let mut open = true;

    loop {
        if !open && deadline.is_none() {
            break;
        }
        tokio::select! {
            _ = shutdown.changed() => break,
            msg = changes.recv(), if open => match msg {
                Some(()) => deadline = Some(Instant::now() + window),
                None => open = false,
            },
            _ = wait_for(deadline) => {
                deadline = None;
                fire().await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

async fn scan_event(root: &Path) -> Option<UpdateEvent> {
    match try_scan(root).await {
        Ok(project) => Some(UpdateEvent::Update(project)),
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "scan failed, skipping cycle");
            None
        }
    }
}

/// Live stream of project snapshots for one root.
///
/// Dropping the subscription, or calling [`Subscription::close`], stops the
/// poller and cancels any pending debounce deadline. A scan already running
/// finishes, but its result is discarded.
pub struct Subscription {
    events: mpsc::Receiver<UpdateEvent>,
    shutdown: watch::Sender<bool>,
}

impl Subscription {
    pub async fn next_event(&mut self) -> Option<UpdateEvent> {
        self.events.recv().await
    }

    pub fn close(&mut self) {
        let _ = self.shutdown.send(true);
        self.events.close();
    }
}

impl Stream for Subscription {
    type Item = UpdateEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Watch `root`. The first event is the initial scan; later events follow
/// debounced filesystem changes. Must be called inside a Tokio runtime.
pub fn subscribe(root: &Path, options: WatchOptions) -> Subscription {
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let root = root.to_path_buf();

    tokio::spawn(drive(root, options, event_tx, shutdown_rx));

    Subscription {
        events: event_rx,
        shutdown: shutdown_tx,
    }
}

async fn drive(
    root: PathBuf,
    options: WatchOptions,
    events: mpsc::Sender<UpdateEvent>,
    shutdown: watch::Receiver<bool>,
) {
    tracing::info!(root = %root.display(), "watch started");

    // Baseline before the initial scan so edits made during it are seen.
    let poller = {
        let root = root.clone();
        match tokio::task::spawn_blocking(move || Poller::new(&root, options.depth)).await {
            Ok(poller) => poller,
            Err(e) => {
                tracing::warn!(error = %e, "could not fingerprint project tree");
                return;
            }
        }
    };

    if let Some(event) = scan_event(&root).await {
        if events.send(event).await.is_err() {
            return;
        }
    }

    let (change_tx, change_rx) = mpsc::channel(CHANGE_BUFFER);
    tokio::spawn(poll_loop(
        poller,
        options.poll_interval,
        change_tx,
        shutdown.clone(),
    ));

    run_debounced(change_rx, options.debounce, shutdown, || {
        let root = root.clone();
        let events = events.clone();
        async move {
            if let Some(event) = scan_event(&root).await {
                let features = event.project().features.len();
                if events.send(event).await.is_ok() {
                    tracing::debug!(root = %root.display(), features, "update emitted");
                }
            }
        }
    })
    .await;

    tracing::info!(root = %root.display(), "watch stopped");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use anyhow::{Context, Result};
use async_trait::async_trait;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::FileSource;
use crate::loader::is_supported;

/// Filesystem notifications for one directory (non-recursive).
pub struct EventSource {
    // Dropping the watcher stops the notifications.
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    pending: VecDeque<PathBuf>,
}

impl EventSource {
    pub fn new(dir: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .context("creating filesystem watcher")?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {}", dir.display()))?;

        Ok(Self {
            _watcher: watcher,
            rx,
            pending: VecDeque::new(),
        })
    }
}

/// Created or modified supported files named by an event.
pub fn candidate_paths(event: &Event) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|p| is_supported(p))
        .cloned()
        .collect()
}

#[async_trait]
impl FileSource for EventSource {
    async fn next_candidate(&mut self) -> Result<Option<PathBuf>> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Ok(Some(path));
            }
            match self.rx.recv().await {
                Some(Ok(event)) => {
                    debug!("fs event {:?} {:?}", event.kind, event.paths);
                    self.pending.extend(candidate_paths(&event));
                }
                Some(Err(e)) => warn!("Watcher error: {}", e),
                None => return Ok(None),
            }
        }
    }

    fn describe(&self) -> String {
        "filesystem events".to_string()
    }
}

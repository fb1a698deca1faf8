pub mod event;
pub mod polling;
pub mod service;
pub mod stability;

pub use event::EventSource;
pub use polling::PollingSource;
pub use service::{HandleOutcome, WatchService};

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{Config, WatchMode};
use crate::loader::is_supported;

/// Something that hands out paths of possibly-new files in the watched
/// directory. `None` means the source has shut down.
#[async_trait]
pub trait FileSource: Send {
    async fn next_candidate(&mut self) -> Result<Option<PathBuf>>;
    fn describe(&self) -> String;
}

/// Event notifications when available, otherwise polling.
pub fn build_source(cfg: &Config) -> Box<dyn FileSource> {
    match cfg.watch_mode {
        WatchMode::Event => match EventSource::new(&cfg.watch_dir) {
            Ok(source) => Box::new(source),
            Err(e) => {
                warn!("Filesystem events unavailable ({:#}), falling back to polling", e);
                Box::new(PollingSource::new(cfg.watch_dir.clone(), cfg.poll_interval()))
            }
        },
        WatchMode::Poll => Box::new(PollingSource::new(cfg.watch_dir.clone(), cfg.poll_interval())),
    }
}

/// Supported regular files in `dir`, sorted by name.
pub async fn list_supported_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_supported(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

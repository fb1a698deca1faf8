use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use super::{list_supported_files, FileSource};

const SCAN_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Rescans the directory on a fixed interval and offers every supported file
/// it finds; the caller decides which ones are new.
pub struct PollingSource {
    dir: PathBuf,
    interval: Duration,
    pending: VecDeque<PathBuf>,
}

impl PollingSource {
    pub fn new(dir: PathBuf, interval: Duration) -> Self {
        Self {
            dir,
            interval,
            pending: VecDeque::new(),
        }
    }

    async fn scan(&mut self) -> Result<()> {
        let files = list_supported_files(&self.dir)
            .await
            .with_context(|| format!("scanning {}", self.dir.display()))?;
        self.pending.extend(files);
        Ok(())
    }
}

#[async_trait]
impl FileSource for PollingSource {
    async fn next_candidate(&mut self) -> Result<Option<PathBuf>> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Ok(Some(path));
            }
            tokio::time::sleep(self.interval).await;
            if let Err(e) = self.scan().await {
                warn!("Error scanning directory: {:#}", e);
                tokio::time::sleep(SCAN_ERROR_BACKOFF).await;
            }
        }
    }

    fn describe(&self) -> String {
        format!("polling every {}s", self.interval.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offers_supported_files_after_interval() {
        let dir = std::env::temp_dir().join(format!("cycle_report_poll_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.csv"), "x").unwrap();
        std::fs::write(dir.join("a.XLSX"), "x").unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        let mut source = PollingSource::new(dir.clone(), Duration::from_millis(5));
        let first = source.next_candidate().await.unwrap().unwrap();
        let second = source.next_candidate().await.unwrap().unwrap();
        assert_eq!(first.file_name().unwrap(), "a.XLSX");
        assert_eq!(second.file_name().unwrap(), "b.csv");

        std::fs::remove_dir_all(&dir).ok();
    }
}

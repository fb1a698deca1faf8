use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::stability::{wait_until_stable, Stability, StabilityPolicy};
use super::{list_supported_files, FileSource};
use crate::loader::is_supported;
use crate::pipeline::process_file;
use crate::report::summary::log_quick_summary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Unsupported or already seen.
    Skipped,
    /// Not stable yet; left unseen so it is offered again.
    Deferred,
    Processed(PathBuf),
    Failed(String),
}

/// Drives a [`FileSource`] and runs the report pipeline for each new file.
pub struct WatchService {
    source: Box<dyn FileSource>,
    output_dir: PathBuf,
    policy: StabilityPolicy,
    seen: HashSet<OsString>,
}

impl WatchService {
    pub fn new(source: Box<dyn FileSource>, output_dir: PathBuf, policy: StabilityPolicy) -> Self {
        Self {
            source,
            output_dir,
            policy,
            seen: HashSet::new(),
        }
    }

    /// Mark the files already in `dir` as seen so only new arrivals are
    /// processed. Returns how many were found.
    pub async fn skip_existing(&mut self, dir: &Path) -> Result<usize> {
        let files = list_supported_files(dir).await?;
        for f in &files {
            if let Some(name) = f.file_name() {
                self.seen.insert(name.to_os_string());
            }
        }
        Ok(files.len())
    }

    pub fn is_seen(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|n| self.seen.contains(n))
    }

    pub async fn run(&mut self) -> Result<()> {
        self.run_until(until_signal(tokio::signal::ctrl_c())).await
    }

    /// Process files until `shutdown` resolves or the source closes.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Watching via {}", self.source.describe());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping watcher...");
                    return Ok(());
                }
                next = self.source.next_candidate() => {
                    match next? {
                        Some(path) => {
                            self.handle(&path).await;
                        }
                        None => {
                            warn!("File source closed, stopping watcher");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    pub async fn handle(&mut self, path: &Path) -> HandleOutcome {
        let Some(name) = path.file_name().map(|n| n.to_os_string()) else {
            return HandleOutcome::Skipped;
        };
        if !is_supported(path) || self.seen.contains(&name) {
            return HandleOutcome::Skipped;
        }

        match wait_until_stable(path, &self.policy).await {
            Stability::Stable => {}
            Stability::Unstable => {
                debug!("{} still being written, will retry", path.display());
                return HandleOutcome::Deferred;
            }
            Stability::Missing => {
                debug!("{} disappeared before processing", path.display());
                return HandleOutcome::Deferred;
            }
        }

        let display_name = name.to_string_lossy().to_string();
        info!("{}", "=".repeat(60));
        info!(
            "[{}] New file detected: {}",
            Local::now().format("%H:%M:%S"),
            display_name
        );
        info!("{}", "=".repeat(60));

        let input = path.to_path_buf();
        let output_dir = self.output_dir.clone();
        let processed =
            tokio::task::spawn_blocking(move || process_file(&input, &output_dir).map_err(|e| e.to_string()))
                .await
                .unwrap_or_else(|e| Err(format!("processing task failed: {}", e)));

        let outcome = match processed {
            Ok(result) => {
                info!("  [SUCCESS] Report saved to: {}", result.report_path.display());
                log_quick_summary(&result.analysis);
                HandleOutcome::Processed(result.report_path)
            }
            Err(e) => {
                error!("  [ERROR] Failed to process {}: {}", display_name, e);
                HandleOutcome::Failed(e)
            }
        };

        // Only after the attempt has committed; failures are not retried.
        self.seen.insert(name);
        outcome
    }
}

/// Resolves when `signal` fires. If the signal handler cannot be installed the
/// error is logged and this never resolves, so the loop keeps running.
async fn until_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Unable to listen for Ctrl+C ({}), stop the process to exit", e);
        std::future::pending::<()>().await;
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::watcher::stability::StabilityPolicy;

/// How the watch directory is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    Event,
    Poll,
}

impl WatchMode {
    pub fn from_str_loose(s: &str) -> Option<WatchMode> {
        match s.trim().to_lowercase().as_str() {
            "event" | "events" | "notify" => Some(WatchMode::Event),
            "poll" | "polling" => Some(WatchMode::Poll),
            _ => None,
        }
    }
}

impl fmt::Display for WatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchMode::Event => write!(f, "event"),
            WatchMode::Poll => write!(f, "poll"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Directories
    pub watch_dir: PathBuf,
    pub output_dir: PathBuf,

    // Watching
    pub watch_mode: WatchMode,
    pub poll_interval_secs: u64,

    // File stability (ms)
    pub settle_delay_ms: u64,
    pub stability_check_ms: u64,
    pub unstable_backoff_ms: u64,
    pub stability_max_attempts: u32,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            watch_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            watch_mode: WatchMode::from_str_loose(&env("WATCH_MODE", "event"))
                .unwrap_or(WatchMode::Event),
            poll_interval_secs: env("POLL_INTERVAL_SECS", "2").parse().unwrap_or(2),
            settle_delay_ms: env("SETTLE_DELAY_MS", "1000").parse().unwrap_or(1000),
            stability_check_ms: env("STABILITY_CHECK_MS", "500").parse().unwrap_or(500),
            unstable_backoff_ms: env("UNSTABLE_BACKOFF_MS", "2000").parse().unwrap_or(2000),
            stability_max_attempts: env("STABILITY_MAX_ATTEMPTS", "5").parse().unwrap_or(5),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Apply `[watch_directory] [output_directory]`; output defaults to the
    /// watch directory.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(watch) = args.first() {
            self.watch_dir = PathBuf::from(watch);
        }
        self.output_dir = match args.get(1) {
            Some(out) => PathBuf::from(out),
            None => self.watch_dir.clone(),
        };
        self
    }

    /// Make both directories absolute against `cwd`.
    pub fn absolutize(mut self, cwd: &Path) -> Self {
        if self.watch_dir.is_relative() {
            self.watch_dir = cwd.join(&self.watch_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = cwd.join(&self.output_dir);
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn stability(&self) -> StabilityPolicy {
        StabilityPolicy {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            check_interval: Duration::from_millis(self.stability_check_ms),
            backoff: Duration::from_millis(self.unstable_backoff_ms),
            max_attempts: self.stability_max_attempts.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::default_test_config;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_watches_current_directory() {
        let cfg = default_test_config().with_args(&[]);
        assert_eq!(cfg.watch_dir, PathBuf::from("."));
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn output_defaults_to_watch_directory() {
        let cfg = default_test_config().with_args(&args(&["./backtests"]));
        assert_eq!(cfg.watch_dir, PathBuf::from("./backtests"));
        assert_eq!(cfg.output_dir, PathBuf::from("./backtests"));
    }

    #[test]
    fn separate_output_directory() {
        let cfg = default_test_config()
            .with_args(&args(&["in", "/reports"]))
            .absolutize(Path::new("/home/me"));
        assert_eq!(cfg.watch_dir, PathBuf::from("/home/me/in"));
        assert_eq!(cfg.output_dir, PathBuf::from("/reports"));
    }

    #[test]
    fn watch_mode_parsing() {
        assert_eq!(WatchMode::from_str_loose("POLL"), Some(WatchMode::Poll));
        assert_eq!(WatchMode::from_str_loose("event"), Some(WatchMode::Event));
        assert_eq!(WatchMode::from_str_loose("inotify"), None);
    }
}

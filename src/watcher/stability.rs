use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityPolicy {
    /// Initial wait before the first size sample.
    pub settle_delay: Duration,
    /// Gap between the two samples of one attempt.
    pub check_interval: Duration,
    /// Wait after an attempt whose samples differ.
    pub backoff: Duration,
    pub max_attempts: u32,
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1000),
            check_interval: Duration::from_millis(500),
            backoff: Duration::from_millis(2000),
            max_attempts: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    /// Still growing after every attempt.
    Unstable,
    /// Gone or unreadable.
    Missing,
}

async fn file_size(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

/// Wait until two consecutive size samples agree.
pub async fn wait_until_stable(path: &Path, policy: &StabilityPolicy) -> Stability {
    tokio::time::sleep(policy.settle_delay).await;

    for attempt in 1..=policy.max_attempts {
        let Some(first) = file_size(path).await else {
            return Stability::Missing;
        };
        tokio::time::sleep(policy.check_interval).await;
        let Some(second) = file_size(path).await else {
            return Stability::Missing;
        };

        if first == second {
            return Stability::Stable;
        }

        debug!(
            "{} still growing ({} -> {} bytes), attempt {}/{}",
            path.display(),
            first,
            second,
            attempt,
            policy.max_attempts
        );
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    Stability::Unstable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> StabilityPolicy {
        StabilityPolicy {
            settle_delay: Duration::from_millis(1),
            check_interval: Duration::from_millis(1),
            backoff: Duration::from_millis(1),
            max_attempts: 2,
        }
    }

    #[tokio::test]
    async fn finished_file_is_stable() {
        let dir = std::env::temp_dir().join(format!("cycle_report_stable_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("done.csv");
        std::fs::write(&path, "Date,PnL\n").unwrap();

        assert_eq!(wait_until_stable(&path, &quick()).await, Stability::Stable);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn missing_file() {
        let path = std::env::temp_dir().join("cycle_report_no_such_file.csv");
        assert_eq!(wait_until_stable(&path, &quick()).await, Stability::Missing);
    }
}

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use cycle_report::config::Config;
use cycle_report::pipeline::process_file;
use cycle_report::report::summary::log_quick_summary;

/// Process the given exports once and exit.
///
/// Usage: cycle-analyze <file>... [--out <dir>]
fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let (files, out_dir) = parse_args(std::env::args().skip(1))?;
    if files.is_empty() {
        bail!("usage: cycle-analyze <file>... [--out <dir>]");
    }

    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut failed = 0;
    for file in &files {
        let target = match &out_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(file),
        };

        info!("Processing {}", file.display());
        match process_file(file, &target) {
            Ok(outcome) => {
                info!("  [SUCCESS] Report saved to: {}", outcome.report_path.display());
                log_quick_summary(&outcome.analysis);
            }
            Err(e) => {
                error!("  [ERROR] Failed to process {}: {}", file.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Vec<PathBuf>, Option<PathBuf>)> {
    let mut files = Vec::new();
    let mut out_dir = None;

    while let Some(arg) = args.next() {
        if arg == "--out" || arg == "-o" {
            let Some(dir) = args.next() else {
                bail!("--out needs a directory");
            };
            out_dir = Some(PathBuf::from(dir));
        } else {
            files.push(PathBuf::from(arg));
        }
    }

    Ok((files, out_dir))
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

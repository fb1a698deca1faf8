use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cycle_report::config::Config;
use cycle_report::loader::SUPPORTED_EXTENSIONS;
use cycle_report::watcher::{build_source, WatchService};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cwd = std::env::current_dir().context("reading current directory")?;
    let cfg = Config::from_env().with_args(&args).absolutize(&cwd);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if !cfg.watch_dir.is_dir() {
        bail!("Watch directory does not exist: {}", cfg.watch_dir.display());
    }
    if !cfg.output_dir.is_dir() {
        std::fs::create_dir_all(&cfg.output_dir)
            .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
        info!("Created output directory: {}", cfg.output_dir.display());
    }

    info!("{}", "=".repeat(60));
    info!("  80-Minute Cycle Report Generator - Auto-Watch Mode");
    info!("{}", "=".repeat(60));
    info!("  Watching: {}", cfg.watch_dir.display());
    info!("  Output:   {}", cfg.output_dir.display());
    info!("  Formats:  {}", SUPPORTED_EXTENSIONS.join(", "));
    info!("  Drop a backtest export file to generate a report!");
    info!("  Press Ctrl+C to stop.");
    info!("{}", "=".repeat(60));

    let source = build_source(&cfg);
    let mut service = WatchService::new(source, cfg.output_dir.clone(), cfg.stability());

    let existing = service.skip_existing(&cfg.watch_dir).await?;
    info!("Found {} existing files (will be skipped)", existing);

    service.run().await?;
    info!("Goodbye!");

    Ok(())
}

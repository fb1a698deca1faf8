use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::columns::resolve_columns;
use crate::core::normalizer::normalize;
use crate::core::sessions::SessionWindow;
use crate::error::Result;
use crate::loader::load_file;
use crate::report::markdown::render_report;
use crate::trading::cycle_analyzer::{CycleAnalysis, CycleAnalyzer};

const REPORT_SUFFIX: &str = "_cycle_report.md";

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub report_path: PathBuf,
    pub analysis: CycleAnalysis,
    pub rows_loaded: usize,
    pub entry_rows: usize,
    pub dropped_outside_session: usize,
}

/// `<dir>/<stem>_cycle_report.md` for an input file.
pub fn report_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_dir.join(format!("{}{}", stem, REPORT_SUFFIX))
}

pub fn process_file(input: &Path, output_dir: &Path) -> Result<ProcessOutcome> {
    process_file_at(input, output_dir, Local::now().naive_local())
}

/// Run the whole pipeline for one file. Nothing is written unless every stage
/// succeeds.
pub fn process_file_at(
    input: &Path,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<ProcessOutcome> {
    let window = SessionWindow::default();

    let (table, metadata) = load_file(input)?;
    info!("  Loaded {} rows", table.len());

    let columns = resolve_columns(table.columns())?;
    let normalized = normalize(&table, &columns, &window)?;
    info!("  Processed {} trade entries", normalized.trades.len());

    let analysis = CycleAnalyzer::new(window).analyze(&normalized.trades);
    info!("  Analyzed {} cycles", analysis.cycles.len());

    let report = render_report(&analysis, &metadata, generated_at);
    let report_path = report_path_for(input, output_dir);
    write_atomic(&report_path, &report)?;

    Ok(ProcessOutcome {
        report_path,
        analysis,
        rows_loaded: table.len(),
        entry_rows: normalized.entry_rows,
        dropped_outside_session: normalized.dropped_outside_session,
    })
}

/// Write to a sibling temp file, then rename over the target.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

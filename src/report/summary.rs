use tracing::info;

use crate::report::format::format_pnl;
use crate::trading::cycle_analyzer::{CycleAnalysis, CycleStat};

/// Short console recap of a processed file.
pub fn log_quick_summary(analysis: &CycleAnalysis) {
    let overall = &analysis.overall;
    info!("  Quick Summary:");
    info!("    Total Trades: {}", overall.total_trades);
    info!("    Win Rate: {:.1}%", overall.win_rate);
    info!("    Net P&L: {}", format_pnl(overall.total_pnl));

    if let Some((best, worst)) = best_and_worst(&analysis.cycles) {
        info!("    Best Cycle: {} ({:.1}% WR)", best.cycle, best.win_rate);
        info!("    Worst Cycle: {} ({:.1}% WR)", worst.cycle, worst.win_rate);
    }
}

/// Highest and lowest win-rate cycles; ties go to the earliest cycle.
pub fn best_and_worst(cycles: &[CycleStat]) -> Option<(&CycleStat, &CycleStat)> {
    let mut iter = cycles.iter();
    let first = iter.next()?;
    let (mut best, mut worst) = (first, first);
    for c in iter {
        if c.win_rate > best.win_rate {
            best = c;
        }
        if c.win_rate < worst.win_rate {
            worst = c;
        }
    }
    Some((best, worst))
}

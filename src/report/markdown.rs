use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

use crate::models::{CellValue, StrategyMetadata};
use crate::report::format::{format_pnl, format_pnl_signed};
use crate::trading::cycle_analyzer::{CycleAnalysis, CycleStat, SideStat};

pub const SESSION_HOURS: &str = "7:00 AM - 4:00 PM EST";
pub const HIGH_WIN_RATE: f64 = 55.0;
pub const LOW_WIN_RATE: f64 = 50.0;
/// Points one side's win rate must lead the other by to be favoured.
pub const SIDE_BIAS_MARGIN: f64 = 10.0;
const HIGHLIGHT_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TradeBoth,
    FavorLongs,
    FavorShorts,
    Caution,
    Skip,
}

impl Action {
    pub fn status(&self) -> &'static str {
        match self {
            Action::TradeBoth | Action::FavorLongs | Action::FavorShorts => "GO",
            Action::Caution => "CAUTION",
            Action::Skip => "SKIP",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::TradeBoth => "Trade both directions",
            Action::FavorLongs => "Favor longs",
            Action::FavorShorts => "Favor shorts",
            Action::Caution => "Trade with caution",
            Action::Skip => "Do not trade",
        }
    }

    pub fn for_cycle(stat: &CycleStat) -> Action {
        if stat.win_rate >= HIGH_WIN_RATE {
            let long_wr = side_win_rate(&stat.long);
            let short_wr = side_win_rate(&stat.short);
            if long_wr > short_wr + SIDE_BIAS_MARGIN {
                Action::FavorLongs
            } else if short_wr > long_wr + SIDE_BIAS_MARGIN {
                Action::FavorShorts
            } else {
                Action::TradeBoth
            }
        } else if stat.win_rate >= LOW_WIN_RATE {
            Action::Caution
        } else {
            Action::Skip
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry<'a> {
    pub priority: usize,
    pub stat: &'a CycleStat,
    pub action: Action,
}

fn side_win_rate(side: &Option<SideStat>) -> f64 {
    side.as_ref().map_or(0.0, |s| s.win_rate)
}

fn side_pnl(side: &Option<SideStat>) -> f64 {
    side.as_ref().map_or(0.0, |s| s.pnl)
}

fn side_count(side: &Option<SideStat>, f: impl Fn(&SideStat) -> usize) -> usize {
    side.as_ref().map_or(0, f)
}

/// Stable sort, so equal keys keep cycle order.
fn ranked_by(cycles: &[CycleStat], descending: bool, key: impl Fn(&CycleStat) -> f64) -> Vec<&CycleStat> {
    let mut ranked: Vec<&CycleStat> = cycles.iter().collect();
    ranked.sort_by(|a, b| {
        let ord = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    ranked
}

pub fn rank_by_win_rate(cycles: &[CycleStat]) -> Vec<&CycleStat> {
    ranked_by(cycles, true, |c| c.win_rate)
}

pub fn rank_by_pnl(cycles: &[CycleStat]) -> Vec<&CycleStat> {
    ranked_by(cycles, true, |c| c.total_pnl)
}

pub fn high_win_rate_cycles(cycles: &[CycleStat]) -> Vec<&CycleStat> {
    rank_by_win_rate(cycles)
        .into_iter()
        .filter(|c| c.win_rate >= HIGH_WIN_RATE)
        .take(HIGHLIGHT_LIMIT)
        .collect()
}

pub fn low_win_rate_cycles(cycles: &[CycleStat]) -> Vec<&CycleStat> {
    ranked_by(cycles, false, |c| c.win_rate)
        .into_iter()
        .filter(|c| c.win_rate < LOW_WIN_RATE)
        .take(HIGHLIGHT_LIMIT)
        .collect()
}

pub fn schedule(cycles: &[CycleStat]) -> Vec<ScheduleEntry<'_>> {
    rank_by_win_rate(cycles)
        .into_iter()
        .enumerate()
        .map(|(i, stat)| ScheduleEntry {
            priority: i + 1,
            stat,
            action: Action::for_cycle(stat),
        })
        .collect()
}

fn rank_badge(rank: usize) -> String {
    match rank {
        1 => "[1st]".to_string(),
        2 => "[2nd]".to_string(),
        3 => "[3rd]".to_string(),
        n => format!("[{}]", n),
    }
}

fn meta_or(metadata: &StrategyMetadata, key: &str, default: &str) -> String {
    metadata
        .get(key)
        .map(|v| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

fn initial_capital(metadata: &StrategyMetadata) -> String {
    match metadata.get("Initial capital") {
        Some(CellValue::Number(n)) => format_pnl(*n),
        Some(other) => other.to_string(),
        None => "N/A".to_string(),
    }
}

/// Markdown cycle report. Rendering is pure: the same inputs always produce
/// the same text.
pub struct CycleReport<'a> {
    pub analysis: &'a CycleAnalysis,
    pub metadata: &'a StrategyMetadata,
    pub generated_at: NaiveDateTime,
}

pub fn render_report(
    analysis: &CycleAnalysis,
    metadata: &StrategyMetadata,
    generated_at: NaiveDateTime,
) -> String {
    CycleReport {
        analysis,
        metadata,
        generated_at,
    }
    .to_string()
}

impl fmt::Display for CycleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_overview(f)?;
        self.write_overall(f)?;
        self.write_cycle_table(f)?;
        self.write_rankings(f)?;
        self.write_side_table(f)?;
        self.write_insights(f)?;
        self.write_schedule(f)?;

        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)?;
        writeln!(
            f,
            "*Report generated: {}*  ",
            self.generated_at.format("%B %d, %Y at %H:%M")
        )?;
        writeln!(f, "*Data source: TradingView Backtest Export*")
    }
}

impl CycleReport<'_> {
    fn write_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overall = &self.analysis.overall;
        let date = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.to_string()).unwrap_or_else(|| "Unknown".to_string())
        };

        writeln!(f, "# 80-Minute Cycle Strategy - Win Rate Analysis Report")?;
        writeln!(f)?;
        writeln!(f, "## Strategy Overview")?;
        writeln!(f)?;
        writeln!(f, "| Parameter | Value |")?;
        writeln!(f, "|-----------|-------|")?;
        writeln!(f, "| **Symbol** | {} |", meta_or(self.metadata, "Symbol", "Unknown"))?;
        writeln!(f, "| **Timeframe** | {} |", meta_or(self.metadata, "Timeframe", "Unknown"))?;
        writeln!(
            f,
            "| **Trading Period** | {} to {} |",
            date(overall.start_date),
            date(overall.end_date)
        )?;
        writeln!(f, "| **Session Hours** | {} |", SESSION_HOURS)?;
        writeln!(
            f,
            "| **Stop Loss** | {} points |",
            meta_or(self.metadata, "Stop Loss (points)", "N/A")
        )?;
        writeln!(
            f,
            "| **Take Profit** | {} points |",
            meta_or(self.metadata, "Take Profit (points)", "N/A")
        )?;
        writeln!(f, "| **Initial Capital** | {} |", initial_capital(self.metadata))?;
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_overall(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.analysis.overall;

        writeln!(f, "## Overall Performance Summary")?;
        writeln!(f)?;
        writeln!(f, "| Metric | All Trades | Long | Short |")?;
        writeln!(f, "|--------|------------|------|-------|")?;
        writeln!(
            f,
            "| **Total Trades** | {} | {} | {} |",
            o.total_trades,
            side_count(&o.long, |s| s.trades),
            side_count(&o.short, |s| s.trades)
        )?;
        writeln!(
            f,
            "| **Winning Trades** | {} | {} | {} |",
            o.wins,
            side_count(&o.long, |s| s.wins),
            side_count(&o.short, |s| s.wins)
        )?;
        writeln!(
            f,
            "| **Losing Trades** | {} | {} | {} |",
            o.losses,
            side_count(&o.long, |s| s.losses),
            side_count(&o.short, |s| s.losses)
        )?;
        writeln!(
            f,
            "| **Win Rate** | {:.2}% | {:.2}% | {:.2}% |",
            o.win_rate,
            side_win_rate(&o.long),
            side_win_rate(&o.short)
        )?;
        writeln!(
            f,
            "| **Net P&L** | {} | {} | {} |",
            format_pnl(o.total_pnl),
            format_pnl(side_pnl(&o.long)),
            format_pnl(side_pnl(&o.short))
        )?;
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_cycle_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Cycle-by-Cycle Win Rate Analysis")?;
        writeln!(f)?;
        writeln!(
            f,
            "The trading session ({}) is divided into **seven 80-minute cycles**. Each cycle consists of:",
            SESSION_HOURS
        )?;
        writeln!(f, "- **Phase A (Accumulation)**: First 40 minutes - Range established")?;
        writeln!(f, "- **Phase B (Execution)**: Last 40 minutes - Trade signals generated")?;
        writeln!(f)?;
        writeln!(f, "### Summary Table")?;
        writeln!(f)?;
        writeln!(f, "| Cycle | Time (EST) | Trades | Wins | Losses | Win Rate | Total P&L | Avg P&L |")?;
        writeln!(f, "|:-----:|:----------:|:------:|:----:|:------:|:--------:|----------:|--------:|")?;
        for c in &self.analysis.cycles {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | **{:.1}%** | {} | {} |",
                c.cycle,
                c.time_range,
                c.total_trades,
                c.wins,
                c.losses,
                c.win_rate,
                format_pnl(c.total_pnl),
                format_pnl(c.avg_pnl)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_rankings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = &self.analysis.cycles;

        writeln!(f, "## Cycle Rankings")?;
        writeln!(f)?;
        writeln!(f, "### By Win Rate (Highest to Lowest)")?;
        writeln!(f)?;
        for (i, c) in rank_by_win_rate(cycles).into_iter().enumerate() {
            writeln!(
                f,
                "**{} Cycle {}** ({}) - **{:.1}%** win rate | {} trades | {}",
                rank_badge(i + 1),
                c.cycle,
                c.time_range,
                c.win_rate,
                c.total_trades,
                format_pnl_signed(c.total_pnl)
            )?;
            writeln!(f)?;
        }

        writeln!(f, "### By Profitability (Best to Worst)")?;
        writeln!(f)?;
        for (i, c) in rank_by_pnl(cycles).into_iter().enumerate() {
            writeln!(
                f,
                "**{} Cycle {}** ({}) - **{}** | {:.1}% WR",
                rank_badge(i + 1),
                c.cycle,
                c.time_range,
                format_pnl_signed(c.total_pnl),
                c.win_rate
            )?;
            writeln!(f)?;
        }
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_side_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Long vs Short Performance by Cycle")?;
        writeln!(f)?;
        writeln!(
            f,
            "| Cycle | Time (EST) | Long Trades | Long WR | Long P&L | Short Trades | Short WR | Short P&L |"
        )?;
        writeln!(
            f,
            "|:-----:|:----------:|:-----------:|:-------:|---------:|:------------:|:--------:|---------:|"
        )?;
        for c in &self.analysis.cycles {
            writeln!(
                f,
                "| {} | {} | {} | {:.1}% | {} | {} | {:.1}% | {} |",
                c.cycle,
                c.time_range,
                side_count(&c.long, |s| s.trades),
                side_win_rate(&c.long),
                format_pnl(side_pnl(&c.long)),
                side_count(&c.short, |s| s.trades),
                side_win_rate(&c.short),
                format_pnl(side_pnl(&c.short))
            )?;
        }
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_insights(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = &self.analysis.cycles;

        writeln!(f, "## Key Insights & Recommendations")?;
        writeln!(f)?;
        writeln!(f, "### HIGH-WIN-RATE CYCLES (Recommended)")?;
        writeln!(f)?;
        writeln!(f, "| Cycle | Time | Win Rate | Insight |")?;
        writeln!(f, "|:-----:|:----:|:--------:|---------|")?;
        for c in high_win_rate_cycles(cycles) {
            let long_note = match &c.long {
                Some(s) => format!("Longs: {:.0}%", s.win_rate),
                None => "No longs".to_string(),
            };
            let short_note = match &c.short {
                Some(s) => format!("Shorts: {:.0}%", s.win_rate),
                None => "No shorts".to_string(),
            };
            writeln!(
                f,
                "| **{}** | {} | **{:.1}%** | {}, {}. P&L: {} |",
                c.cycle,
                c.time_range,
                c.win_rate,
                long_note,
                short_note,
                format_pnl_signed(c.total_pnl)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "### LOW-WIN-RATE CYCLES (Avoid or Modify)")?;
        writeln!(f)?;
        writeln!(f, "| Cycle | Time | Win Rate | Issue |")?;
        writeln!(f, "|:-----:|:----:|:--------:|-------|")?;
        for c in low_win_rate_cycles(cycles) {
            writeln!(
                f,
                "| **{}** | {} | **{:.1}%** | P&L: {}. Consider skipping this cycle. |",
                c.cycle,
                c.time_range,
                c.win_rate,
                format_pnl(c.total_pnl)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "### Strategic Recommendations")?;
        writeln!(f)?;
        let by_wr = rank_by_win_rate(cycles);
        let by_pnl = rank_by_pnl(cycles);
        if let (Some(best), Some(worst), Some(top), Some(bottom)) =
            (by_wr.first(), by_wr.last(), by_pnl.first(), by_pnl.last())
        {
            writeln!(
                f,
                "1. **Best Cycle**: Cycle {} ({}) has the highest win rate at {:.1}%.",
                best.cycle, best.time_range, best.win_rate
            )?;
            writeln!(f)?;
            writeln!(
                f,
                "2. **Worst Cycle**: Cycle {} ({}) has the lowest win rate at {:.1}%. Consider avoiding.",
                worst.cycle, worst.time_range, worst.win_rate
            )?;
            writeln!(f)?;
            writeln!(
                f,
                "3. **Most Profitable**: Cycle {} ({}) generated {}.",
                top.cycle,
                top.time_range,
                format_pnl_signed(top.total_pnl)
            )?;
            writeln!(f)?;
            writeln!(
                f,
                "4. **Biggest Loser**: Cycle {} ({}) lost {}.",
                bottom.cycle,
                bottom.time_range,
                format_pnl(bottom.total_pnl)
            )?;
            writeln!(f)?;
        }

        let overall = &self.analysis.overall;
        let long_wr = side_win_rate(&overall.long);
        let short_wr = side_win_rate(&overall.short);
        writeln!(
            f,
            "5. **Direction Bias**: {} ({:.1}% vs {:.1}%).",
            if long_wr > short_wr {
                "Longs outperform shorts"
            } else {
                "Shorts outperform longs"
            },
            long_wr,
            short_wr
        )?;
        writeln!(f)?;
        writeln!(f, "---")?;
        writeln!(f)
    }

    fn write_schedule(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Recommended Trading Schedule")?;
        writeln!(f)?;
        writeln!(f, "| Priority | Cycle | Time (EST) | Win Rate | Action |")?;
        writeln!(f, "|:--------:|:-----:|:----------:|:--------:|--------|")?;
        for entry in schedule(&self.analysis.cycles) {
            writeln!(
                f,
                "| [{}] {} | {} | {} | {:.1}% | {} |",
                entry.action.status(),
                entry.priority,
                entry.stat.cycle,
                entry.stat.time_range,
                entry.stat.win_rate,
                entry.action.describe()
            )?;
        }
        Ok(())
    }
}

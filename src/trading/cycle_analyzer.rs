use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::sessions::SessionWindow;
use crate::models::Side;
use crate::trading::trade_record::NormalizedTrade;

/// Counts for one direction within a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideStat {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStat {
    pub cycle: usize,
    pub time_range: String,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent, one decimal.
    pub win_rate: f64,
    pub total_pnl: f64,
    /// Rounded to whole currency units.
    pub avg_pnl: f64,
    pub long: Option<SideStat>,
    pub short: Option<SideStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStat {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent, two decimals.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub long: Option<SideStat>,
    pub short: Option<SideStat>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Only cycles with at least one trade, in cycle order.
    pub cycles: Vec<CycleStat>,
    pub overall: OverallStat,
}

pub struct CycleAnalyzer {
    pub window: SessionWindow,
}

impl Default for CycleAnalyzer {
    fn default() -> Self {
        Self::new(SessionWindow::default())
    }
}

impl CycleAnalyzer {
    pub fn new(window: SessionWindow) -> Self {
        Self { window }
    }

    pub fn analyze(&self, trades: &[NormalizedTrade]) -> CycleAnalysis {
        let cycles = self
            .window
            .cycles()
            .filter_map(|cycle| {
                let bucket: Vec<&NormalizedTrade> =
                    trades.iter().filter(|t| t.cycle == cycle).collect();
                self.cycle_stats(cycle, &bucket)
            })
            .collect();

        CycleAnalysis {
            cycles,
            overall: self.overall_stats(trades),
        }
    }

    fn cycle_stats(&self, cycle: usize, trades: &[&NormalizedTrade]) -> Option<CycleStat> {
        if trades.is_empty() {
            return None;
        }

        let total = trades.len();
        let wins = count_wins(trades);
        let total_pnl = sum_pnl(trades);

        Some(CycleStat {
            cycle,
            time_range: self.window.label(cycle),
            total_trades: total,
            wins,
            losses: total - wins,
            win_rate: round_to(win_rate(wins, total), 1),
            total_pnl,
            avg_pnl: (total_pnl / total as f64).round_ties_even(),
            long: side_stats(trades, Side::Long, 1),
            short: side_stats(trades, Side::Short, 1),
        })
    }

    fn overall_stats(&self, trades: &[NormalizedTrade]) -> OverallStat {
        let all: Vec<&NormalizedTrade> = trades.iter().collect();
        let total = all.len();
        let wins = count_wins(&all);

        OverallStat {
            total_trades: total,
            wins,
            losses: total - wins,
            win_rate: round_to(win_rate(wins, total), 2),
            total_pnl: sum_pnl(&all),
            long: side_stats(&all, Side::Long, 2),
            short: side_stats(&all, Side::Short, 2),
            start_date: trades.iter().map(|t| t.date()).min(),
            end_date: trades.iter().map(|t| t.date()).max(),
        }
    }
}

fn side_stats(trades: &[&NormalizedTrade], side: Side, decimals: i32) -> Option<SideStat> {
    let subset: Vec<&NormalizedTrade> = trades.iter().copied().filter(|t| t.side == side).collect();
    if subset.is_empty() {
        return None;
    }
    let total = subset.len();
    let wins = count_wins(&subset);
    Some(SideStat {
        trades: total,
        wins,
        losses: total - wins,
        win_rate: round_to(win_rate(wins, total), decimals),
        pnl: sum_pnl(&subset),
    })
}

fn count_wins(trades: &[&NormalizedTrade]) -> usize {
    trades.iter().filter(|t| t.is_win()).count()
}

fn sum_pnl(trades: &[&NormalizedTrade]) -> f64 {
    trades.iter().map(|t| t.pnl).sum()
}

fn win_rate(wins: usize, total: usize) -> f64 {
    if total > 0 {
        100.0 * wins as f64 / total as f64
    } else {
        0.0
    }
}

/// Rounds half to even, so 6.25 becomes 6.2 and -12.5 becomes -12.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{trade, two_cycle_scenario};

    #[test]
    fn two_cycle_scenario_stats() {
        let analysis = CycleAnalyzer::default().analyze(&two_cycle_scenario());
        assert_eq!(analysis.cycles.len(), 2);

        let c0 = &analysis.cycles[0];
        assert_eq!(c0.cycle, 0);
        assert_eq!(c0.total_trades, 5);
        assert_eq!(c0.wins, 4);
        assert!((c0.win_rate - 80.0).abs() < 1e-9);
        assert!((c0.total_pnl - 650.0).abs() < 1e-9);
        assert!((c0.avg_pnl - 130.0).abs() < 1e-9);

        let c3 = &analysis.cycles[1];
        assert_eq!(c3.cycle, 3);
        assert_eq!(c3.time_range, "11:00 - 12:20");
        assert!((c3.win_rate - 20.0).abs() < 1e-9);
        assert!((c3.total_pnl - 100.0).abs() < 1e-9);

        let o = &analysis.overall;
        assert_eq!(o.total_trades, 10);
        assert_eq!(o.wins, 5);
        assert!((o.win_rate - 50.0).abs() < 1e-9);
        assert!((o.total_pnl - 750.0).abs() < 1e-9);
        assert_eq!(o.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(o.end_date, NaiveDate::from_ymd_opt(2024, 1, 19));
    }

    #[test]
    fn counts_are_consistent() {
        let trades = two_cycle_scenario();
        let analysis = CycleAnalyzer::default().analyze(&trades);
        let total: usize = analysis.cycles.iter().map(|c| c.total_trades).sum();
        assert_eq!(total, trades.len());
        for c in &analysis.cycles {
            assert_eq!(c.wins + c.losses, c.total_trades);
            let sides = c.long.as_ref().map_or(0, |s| s.trades)
                + c.short.as_ref().map_or(0, |s| s.trades);
            assert_eq!(sides, c.total_trades);
        }
    }

    #[test]
    fn cycle_win_rates_match_literal_values() {
        let analysis = CycleAnalyzer::default().analyze(&two_cycle_scenario());
        let rates: Vec<f64> = analysis.cycles.iter().map(|c| c.win_rate).collect();
        assert_eq!(rates, vec![80.0, 20.0]);

        let mut trades = vec![trade("2024-01-15 07:05", Side::Long, 10.0)];
        for i in 0..15 {
            trades.push(trade(&format!("2024-01-15 07:{:02}", 10 + i), Side::Short, -10.0));
        }
        let analysis = CycleAnalyzer::default().analyze(&trades);
        assert!((analysis.cycles[0].win_rate - 6.2).abs() < 1e-9);
        assert!((analysis.overall.win_rate - 6.25).abs() < 1e-9);
    }

    #[test]
    fn half_values_round_to_even() {
        let trades = vec![
            trade("2024-01-15 07:05", Side::Long, 25.0),
            trade("2024-01-15 07:10", Side::Short, -50.0),
        ];
        let analysis = CycleAnalyzer::default().analyze(&trades);
        assert_eq!(analysis.cycles[0].avg_pnl, -12.0);

        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(-12.5, 0), -12.0);
    }

    #[test]
    fn overall_and_cycle_precision_differ() {
        let trades = vec![
            trade("2024-01-15 07:05", Side::Long, 10.0),
            trade("2024-01-15 07:10", Side::Long, 10.0),
            trade("2024-01-15 07:15", Side::Long, -10.0),
        ];
        let analysis = CycleAnalyzer::default().analyze(&trades);
        assert!((analysis.cycles[0].win_rate - 66.7).abs() < 1e-9);
        assert!((analysis.overall.win_rate - 66.67).abs() < 1e-9);
        let long = analysis.cycles[0].long.as_ref().unwrap();
        assert!((long.win_rate - 66.7).abs() < 1e-9);
        let overall_long = analysis.overall.long.as_ref().unwrap();
        assert!((overall_long.win_rate - 66.67).abs() < 1e-9);
    }

    #[test]
    fn empty_cycles_are_omitted() {
        let trades = vec![
            trade("2024-01-15 15:30", Side::Short, 5.0),
            trade("2024-01-15 07:30", Side::Long, 5.0),
        ];
        let cycles: Vec<usize> = CycleAnalyzer::default()
            .analyze(&trades)
            .cycles
            .iter()
            .map(|c| c.cycle)
            .collect();
        assert_eq!(cycles, vec![0, 6]);
    }

    #[test]
    fn missing_side_is_none() {
        let trades = vec![trade("2024-01-15 07:05", Side::Long, 10.0)];
        let analysis = CycleAnalyzer::default().analyze(&trades);
        assert!(analysis.cycles[0].short.is_none());
        assert!(analysis.overall.short.is_none());
    }

    #[test]
    fn unknown_side_is_counted_in_totals_only() {
        let trades = vec![
            trade("2024-01-15 07:05", Side::Unknown, 10.0),
            trade("2024-01-15 07:25", Side::Unknown, -4.0),
        ];
        let analysis = CycleAnalyzer::default().analyze(&trades);
        let c = &analysis.cycles[0];
        assert_eq!(c.total_trades, 2);
        assert!(c.long.is_none() && c.short.is_none());
        assert!((c.avg_pnl - 3.0).abs() < 1e-9);
    }

    #[test]
    fn average_pnl_rounds_to_whole_units() {
        let trades = vec![
            trade("2024-01-15 07:05", Side::Long, 10.0),
            trade("2024-01-15 07:10", Side::Long, 10.0),
            trade("2024-01-15 07:15", Side::Long, -5.0),
        ];
        let analysis = CycleAnalyzer::default().analyze(&trades);
        assert!((analysis.cycles[0].avg_pnl - 5.0).abs() < 1e-9);
        assert!((analysis.cycles[0].total_pnl - 15.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_zero_overall() {
        let analysis = CycleAnalyzer::default().analyze(&[]);
        assert!(analysis.cycles.is_empty());
        assert_eq!(analysis.overall.total_trades, 0);
        assert_eq!(analysis.overall.win_rate, 0.0);
        assert!(analysis.overall.start_date.is_none());
    }
}

pub mod cycle_analyzer;
pub mod trade_record;

pub use cycle_analyzer::{CycleAnalysis, CycleAnalyzer, CycleStat, OverallStat, SideStat};
pub use trade_record::NormalizedTrade;

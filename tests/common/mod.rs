use std::path::{Path, PathBuf};

/// Fresh scratch directory for one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cycle_report_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// TradingView "List of trades" export: every trade has an entry and an exit
/// row, both carrying the trade's net P&L.
pub fn tradingview_csv(trades: &[(&str, &str, &str, f64)]) -> String {
    let mut out = String::from("Trade #,Type,Signal,Date/Time,Price USD,Contracts,Net P&L USD\n");
    for (i, (side, entry_time, exit_time, pnl)) in trades.iter().enumerate() {
        let n = i + 1;
        out.push_str(&format!("{},Exit {},Close,{},17000,1,{}\n", n, side, exit_time, pnl));
        out.push_str(&format!("{},Entry {},Open,{},17000,1,{}\n", n, side, entry_time, pnl));
    }
    out
}

/// Ten trades: five in the 07:00 cycle (+650 net) and five in the 11:00 cycle
/// (+100 net).
pub fn scenario_csv() -> String {
    tradingview_csv(&[
        ("Long", "2024-01-15 07:05", "2024-01-15 07:15", 400.0),
        ("Long", "2024-01-15 07:20", "2024-01-15 07:30", 100.0),
        ("Short", "2024-01-16 07:35", "2024-01-16 07:45", 100.0),
        ("Long", "2024-01-16 07:50", "2024-01-16 08:00", 100.0),
        ("Short", "2024-01-17 08:10", "2024-01-17 08:30", -50.0),
        ("Short", "2024-01-15 11:05", "2024-01-15 11:15", 300.0),
        ("Long", "2024-01-16 11:20", "2024-01-16 11:30", -50.0),
        ("Short", "2024-01-17 11:40", "2024-01-17 11:50", -50.0),
        ("Long", "2024-01-18 12:00", "2024-01-18 12:10", -50.0),
        ("Short", "2024-01-19 12:15", "2024-01-19 12:25", -50.0),
    ])
}

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

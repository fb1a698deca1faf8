pub mod format;
pub mod markdown;
pub mod summary;

pub use format::{format_pnl, format_pnl_signed};
pub use markdown::{render_report, CycleReport};

pub mod side;
pub mod table;

pub use side::Side;
pub use table::{CellValue, RawTable, StrategyMetadata};

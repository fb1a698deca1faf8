use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Side;

/// One trade entry that falls inside the session window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrade {
    pub timestamp: NaiveDateTime,
    pub cycle: usize,
    pub side: Side,
    pub pnl: f64,
}

impl NormalizedTrade {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Break-even trades are not wins.
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}

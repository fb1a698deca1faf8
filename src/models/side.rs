use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional classification of a trade entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
    Unknown,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "Long",
            Side::Short => "Short",
            Side::Unknown => "Unknown",
        }
    }

    /// Classify a trade-type label such as "Entry Long".
    ///
    /// Anything that does not mention "long" is treated as a short, including
    /// labels that are neither ("reversal"). Exports only ever carry the two
    /// directions, so the binary split is kept as is.
    pub fn from_trade_type(label: &str) -> Side {
        if label.to_lowercase().contains("long") {
            Side::Long
        } else {
            Side::Short
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels() {
        assert_eq!(Side::from_trade_type("Entry Long"), Side::Long);
        assert_eq!(Side::from_trade_type("ENTRY LONG"), Side::Long);
    }

    #[test]
    fn short_labels() {
        assert_eq!(Side::from_trade_type("Entry Short"), Side::Short);
    }

    #[test]
    fn unrecognised_label_falls_back_to_short() {
        assert_eq!(Side::from_trade_type("reversal"), Side::Short);
        assert_eq!(Side::from_trade_type(""), Side::Short);
    }
}

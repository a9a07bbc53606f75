use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trade direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Buy,
    Sell,
}

impl Direction {
    /// Permissive form-field parse: exactly `"BUY"` is a buy, every other
    /// value is treated as a sell.
    pub fn from_label(label: &str) -> Self {
        if label == "BUY" {
            Direction::Buy
        } else {
            Direction::Sell
        }
    }

    /// Serde hook for stored trades: the `type` field goes through
    /// [`Direction::from_label`].
    pub fn deserialize_label<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    /// Signed price movement in this direction's favour.
    pub fn price_diff(self, entry_price: f64, exit_price: f64) -> f64 {
        match self {
            Direction::Buy => exit_price - entry_price,
            Direction::Sell => entry_price - exit_price,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown direction '{0}' (expected BUY or SELL)")]
pub struct ParseDirectionError(pub String);

/// Strict parse, case-insensitive. Use [`Direction::from_label`] for the
/// lenient behaviour.
impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => Ok(Direction::Buy),
            "SELL" | "SHORT" => Ok(Direction::Sell),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

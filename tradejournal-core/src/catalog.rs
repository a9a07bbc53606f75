//! Selectable pair catalog with search, backing the symbol picker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PairCategory {
    Major,
    Cross,
    Metal,
    Index,
    Crypto,
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PairCategory::Major => "Major",
            PairCategory::Cross => "Cross",
            PairCategory::Metal => "Metal",
            PairCategory::Index => "Index",
            PairCategory::Crypto => "Crypto",
        };
        f.pad(s)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown pair category '{0}' (expected major, cross, metal, index or crypto)")]
pub struct ParseCategoryError(String);

impl FromStr for PairCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(PairCategory::Major),
            "cross" => Ok(PairCategory::Cross),
            "metal" => Ok(PairCategory::Metal),
            "index" => Ok(PairCategory::Index),
            "crypto" => Ok(PairCategory::Crypto),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub symbol: &'static str,
    pub label: &'static str,
    pub category: PairCategory,
}

const fn entry(symbol: &'static str, label: &'static str, category: PairCategory) -> CatalogEntry {
    CatalogEntry { symbol, label, category }
}

pub static CATALOG: &[CatalogEntry] = &[
    entry("EURUSD", "EUR/USD - Euro vs US Dollar", PairCategory::Major),
    entry("GBPUSD", "GBP/USD - British Pound vs US Dollar", PairCategory::Major),
    entry("USDJPY", "USD/JPY - US Dollar vs Japanese Yen", PairCategory::Major),
    entry("USDCHF", "USD/CHF - US Dollar vs Swiss Franc", PairCategory::Major),
    entry("AUDUSD", "AUD/USD - Australian Dollar vs US Dollar", PairCategory::Major),
    entry("USDCAD", "USD/CAD - US Dollar vs Canadian Dollar", PairCategory::Major),
    entry("NZDUSD", "NZD/USD - New Zealand Dollar vs US Dollar", PairCategory::Major),
    entry("EURGBP", "EUR/GBP - Euro vs British Pound", PairCategory::Cross),
    entry("EURJPY", "EUR/JPY - Euro vs Japanese Yen", PairCategory::Cross),
    entry("GBPJPY", "GBP/JPY - British Pound vs Japanese Yen", PairCategory::Cross),
    entry("EURCHF", "EUR/CHF - Euro vs Swiss Franc", PairCategory::Cross),
    entry("AUDJPY", "AUD/JPY - Australian Dollar vs Japanese Yen", PairCategory::Cross),
    entry("CADJPY", "CAD/JPY - Canadian Dollar vs Japanese Yen", PairCategory::Cross),
    entry("XAUUSD", "XAU/USD - Gold vs US Dollar", PairCategory::Metal),
    entry("XAGUSD", "XAG/USD - Silver vs US Dollar", PairCategory::Metal),
    entry("US30", "US30 - Dow Jones Industrial Average", PairCategory::Index),
    entry("NAS100", "NAS100 - Nasdaq 100", PairCategory::Index),
    entry("SPX500", "SPX500 - S&P 500", PairCategory::Index),
    entry("GER40", "GER40 - DAX 40", PairCategory::Index),
    entry("BTCUSD", "BTC/USD - Bitcoin vs US Dollar", PairCategory::Crypto),
    entry("ETHUSD", "ETH/USD - Ethereum vs US Dollar", PairCategory::Crypto),
];

/// Case-insensitive substring search over symbol and label.
/// An empty (or all-whitespace) query returns the whole catalog.
pub fn search(query: &str) -> Vec<&'static CatalogEntry> {
    let needle = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|e| {
            needle.is_empty()
                || e.symbol.to_lowercase().contains(&needle)
                || e.label.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn by_category(category: PairCategory) -> Vec<&'static CatalogEntry> {
    CATALOG.iter().filter(|e| e.category == category).collect()
}

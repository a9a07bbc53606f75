//! Instrument table and classification.
//!
//! The table is a process-wide constant: one `InstrumentConfig` per known
//! normalized symbol. Anything not in the table is priced as a standard
//! forex pair (`DEFAULT_CONFIG`).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::symbol::normalize;

/// Pip convention and lot size for one instrument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentConfig {
    /// Decimal places that define one pip (0 for index points).
    pub pip_position: u32,
    /// Units per standard lot.
    pub contract_size: f64,
}

impl InstrumentConfig {
    const fn new(pip_position: u32, contract_size: f64) -> Self {
        Self { pip_position, contract_size }
    }
}

/// Standard forex: 1 pip = 0.0001, 1 lot = 100,000 units.
pub const DEFAULT_CONFIG: InstrumentConfig = InstrumentConfig::new(4, 100_000.0);

static INSTRUMENTS: &[(&str, InstrumentConfig)] = &[
    // Majors
    ("EURUSD", InstrumentConfig::new(4, 100_000.0)),
    ("GBPUSD", InstrumentConfig::new(4, 100_000.0)),
    ("USDJPY", InstrumentConfig::new(2, 100_000.0)),
    ("USDCHF", InstrumentConfig::new(4, 100_000.0)),
    ("AUDUSD", InstrumentConfig::new(4, 100_000.0)),
    ("NZDUSD", InstrumentConfig::new(4, 100_000.0)),
    ("USDCAD", InstrumentConfig::new(4, 100_000.0)),
    // Crosses
    ("EURGBP", InstrumentConfig::new(4, 100_000.0)),
    ("EURJPY", InstrumentConfig::new(2, 100_000.0)),
    ("GBPJPY", InstrumentConfig::new(2, 100_000.0)),
    ("EURCHF", InstrumentConfig::new(4, 100_000.0)),
    ("AUDJPY", InstrumentConfig::new(2, 100_000.0)),
    ("CADJPY", InstrumentConfig::new(2, 100_000.0)),
    // Metals
    ("XAUUSD", InstrumentConfig::new(2, 100.0)),
    ("XAGUSD", InstrumentConfig::new(3, 5_000.0)),
    // Indices
    ("US30", InstrumentConfig::new(0, 1.0)),
    ("NAS100", InstrumentConfig::new(1, 1.0)),
    ("SPX500", InstrumentConfig::new(1, 1.0)),
    ("GER40", InstrumentConfig::new(1, 1.0)),
    // Crypto CFDs
    ("BTCUSD", InstrumentConfig::new(2, 1.0)),
    ("ETHUSD", InstrumentConfig::new(2, 1.0)),
];

const INDEX_SYMBOLS: [&str; 4] = ["US30", "NAS100", "SPX500", "GER40"];

/// Look up the config for an already-normalized symbol.
pub fn lookup(normalized: &str) -> Option<&'static InstrumentConfig> {
    INSTRUMENTS
        .iter()
        .find(|(symbol, _)| *symbol == normalized)
        .map(|(_, config)| config)
}

/// Config for a normalized symbol, falling back to standard forex.
pub fn config_or_default(normalized: &str) -> InstrumentConfig {
    lookup(normalized).copied().unwrap_or(DEFAULT_CONFIG)
}

/// All symbols with a dedicated config, in table order.
pub fn known_symbols() -> impl Iterator<Item = &'static str> {
    INSTRUMENTS.iter().map(|(symbol, _)| *symbol)
}

/// Broad instrument family. Drives formula selection and the pair info label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    Gold,
    Silver,
    Index,
    Crypto,
    ForexPair,
}

impl InstrumentKind {
    /// Label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            InstrumentKind::Gold => "Gold",
            InstrumentKind::Silver => "Silver",
            InstrumentKind::Index => "Index",
            InstrumentKind::Crypto => "Crypto",
            InstrumentKind::ForexPair => "Forex Pair",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Classify a normalized symbol. First matching rule wins:
/// `XAU*`, `XAG*`, the four index symbols, anything containing `BTC`/`ETH`,
/// then forex.
pub fn classify(normalized: &str) -> InstrumentKind {
    if normalized.starts_with("XAU") {
        InstrumentKind::Gold
    } else if normalized.starts_with("XAG") {
        InstrumentKind::Silver
    } else if INDEX_SYMBOLS.contains(&normalized) {
        InstrumentKind::Index
    } else if normalized.contains("BTC") || normalized.contains("ETH") {
        InstrumentKind::Crypto
    } else {
        InstrumentKind::ForexPair
    }
}

/// JPY-quoted pairs get their own P/L and pip-value formulas.
pub fn is_jpy_quoted(normalized: &str) -> bool {
    normalized.contains("JPY")
}

/// Descriptive pair info for display next to a trade form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind_label: String,
    pub contract_size: f64,
    pub pip_position: u32,
}

/// Describe `symbol`. Unknown symbols keep the caller's spelling as the name
/// and report the standard forex defaults.
pub fn describe(symbol: &str) -> PairInfo {
    let normalized = normalize(symbol);
    match lookup(&normalized) {
        Some(config) => PairInfo {
            kind_label: classify(&normalized).label().to_string(),
            name: normalized,
            contract_size: config.contract_size,
            pip_position: config.pip_position,
        },
        None => PairInfo {
            name: symbol.to_string(),
            kind_label: InstrumentKind::ForexPair.label().to_string(),
            contract_size: DEFAULT_CONFIG.contract_size,
            pip_position: DEFAULT_CONFIG.pip_position,
        },
    }
}

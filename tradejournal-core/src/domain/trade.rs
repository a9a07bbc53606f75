//! Journal entries: one logged trade (or a "no trade today" marker).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::TradeId;
use crate::pricing::{compute_pip_value, compute_pl, normalize, Direction};

/// Symbol stored on no-trade days.
pub const NO_TRADE_SYMBOL: &str = "NO-TRADE";

/// A journal entry with its P/L computed at creation/edit time.
///
/// Field names serialize in camelCase; `direction` is stored under `type`
/// and the lot size also loads from `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    pub id: TradeId,
    pub date: NaiveDate,
    pub symbol: String,
    #[serde(rename = "type", deserialize_with = "Direction::deserialize_label")]
    pub direction: Direction,
    #[serde(alias = "quantity")]
    pub lot_size: f64,
    pub entry_price: f64,
    /// `0.0` while the position is open.
    pub exit_price: f64,
    #[serde(default)]
    pub notes: String,
    /// Screenshot reference (data URL or file path), opaque to the journal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Planned risk/reward as free text, e.g. `"1:2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_reward_ratio: Option<String>,
    #[serde(default)]
    pub is_no_trade: bool,
    pub profit_loss: f64,
    #[serde(default)]
    pub pip_value: f64,
    pub created_at: DateTime<Utc>,
}

impl TradeEntry {
    /// Real trade, as opposed to a no-trade day marker.
    pub fn is_actual(&self) -> bool {
        !self.is_no_trade && self.symbol != NO_TRADE_SYMBOL
    }

    pub fn is_open(&self) -> bool {
        self.is_actual() && self.exit_price == 0.0
    }

    pub fn is_winner(&self) -> bool {
        self.profit_loss > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.profit_loss < 0.0
    }

    /// `"EURUSD - BUY"`, used when confirming a delete.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.symbol, self.direction)
    }

    pub fn risk_reward(&self) -> Option<RiskReward> {
        self.risk_reward_ratio.as_deref().and_then(RiskReward::parse)
    }

    /// Recompute the cached P/L and pip value from the stored fields.
    pub fn recompute(&mut self) {
        if self.is_actual() {
            self.profit_loss = compute_pl(
                &self.symbol,
                self.lot_size,
                self.entry_price,
                self.exit_price,
                self.direction,
            );
            self.pip_value = compute_pip_value(&self.symbol, self.lot_size);
        } else {
            self.profit_loss = 0.0;
            self.pip_value = 0.0;
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("symbol is required")]
    MissingSymbol,

    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("lot size must be positive, got {0}")]
    NonPositiveLotSize(f64),
}

/// Raw trade form input. Numeric fields stay as text until
/// [`TradeDraft::into_entry`] parses them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeDraft {
    pub date: NaiveDate,
    pub symbol: String,
    pub direction: Direction,
    pub lot_size: String,
    pub entry_price: String,
    pub exit_price: String,
    pub notes: String,
    pub screenshot: Option<String>,
    pub risk_reward_ratio: String,
    pub is_no_trade: bool,
}

impl TradeDraft {
    /// Draft for a day on which no trade was taken.
    pub fn no_trade(date: NaiveDate, notes: impl Into<String>) -> Self {
        Self {
            date,
            symbol: NO_TRADE_SYMBOL.into(),
            direction: Direction::Buy,
            lot_size: "0".into(),
            entry_price: "0".into(),
            exit_price: "0".into(),
            notes: notes.into(),
            is_no_trade: true,
            ..Self::default()
        }
    }

    /// Pre-fill a draft from an existing entry for editing.
    pub fn from_entry(entry: &TradeEntry) -> Self {
        Self {
            date: entry.date,
            symbol: entry.symbol.clone(),
            direction: entry.direction,
            lot_size: entry.lot_size.to_string(),
            entry_price: entry.entry_price.to_string(),
            exit_price: entry.exit_price.to_string(),
            notes: entry.notes.clone(),
            screenshot: entry.screenshot.clone(),
            risk_reward_ratio: entry.risk_reward_ratio.clone().unwrap_or_default(),
            is_no_trade: entry.is_no_trade,
        }
    }

    /// P/L preview while the form is being filled in. `None` until symbol,
    /// lot size and both prices are present and numeric.
    pub fn preview_pl(&self) -> Option<f64> {
        if self.symbol.trim().is_empty() {
            return None;
        }
        let lot = parse_number(&self.lot_size)?;
        let entry = parse_number(&self.entry_price)?;
        let exit = parse_number(&self.exit_price)?;
        Some(compute_pl(&self.symbol, lot, entry, exit, self.direction))
    }

    /// Parse the draft into a journal entry, computing P/L and pip value.
    ///
    /// An empty or non-numeric exit price means "still open" and is stored
    /// as `0.0`.
    pub fn into_entry(
        self,
        id: TradeId,
        created_at: DateTime<Utc>,
    ) -> Result<TradeEntry, DraftError> {
        let risk_reward_ratio = Some(self.risk_reward_ratio.trim().to_string())
            .filter(|s| !s.is_empty());

        if self.is_no_trade {
            return Ok(TradeEntry {
                id,
                date: self.date,
                symbol: NO_TRADE_SYMBOL.into(),
                direction: Direction::Buy,
                lot_size: 0.0,
                entry_price: 0.0,
                exit_price: 0.0,
                notes: self.notes,
                screenshot: self.screenshot,
                risk_reward_ratio,
                is_no_trade: true,
                profit_loss: 0.0,
                pip_value: 0.0,
                created_at,
            });
        }

        let symbol = normalize(&self.symbol);
        if symbol.is_empty() {
            return Err(DraftError::MissingSymbol);
        }

        let lot_size = require_number("lot size", &self.lot_size)?;
        if lot_size <= 0.0 {
            return Err(DraftError::NonPositiveLotSize(lot_size));
        }
        let entry_price = require_number("entry price", &self.entry_price)?;
        let exit_price = parse_number(&self.exit_price).unwrap_or(0.0);

        let mut entry = TradeEntry {
            id,
            date: self.date,
            symbol,
            direction: self.direction,
            lot_size,
            entry_price,
            exit_price,
            notes: self.notes,
            screenshot: self.screenshot,
            risk_reward_ratio,
            is_no_trade: false,
            profit_loss: 0.0,
            pip_value: 0.0,
            created_at,
        };
        entry.recompute();
        Ok(entry)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn require_number(field: &'static str, raw: &str) -> Result<f64, DraftError> {
    parse_number(raw).ok_or_else(|| DraftError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Parsed `risk:reward` ratio such as `1:2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskReward {
    pub risk: f64,
    pub reward: f64,
}

impl RiskReward {
    pub fn parse(raw: &str) -> Option<Self> {
        let (risk, reward) = raw.split_once(':')?;
        let risk = parse_number(risk)?;
        let reward = parse_number(reward)?;
        if risk <= 0.0 || reward < 0.0 {
            return None;
        }
        Some(Self { risk, reward })
    }

    /// Reward per unit of risk (`1:3` → 3.0).
    pub fn multiple(&self) -> f64 {
        self.reward / self.risk
    }
}

//! Strategy: a named bucket of trades with its own starting balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{StrategyId, TradeId};
use super::trade::TradeEntry;

pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("strategy name must not be empty")]
    EmptyName,

    #[error("trade {0} not found")]
    TradeNotFound(TradeId),

    #[error("trade {0} already exists")]
    DuplicateTrade(TradeId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: StrategyId,
    pub name: String,
    pub starting_balance: f64,
    /// Newest first.
    #[serde(default)]
    pub trades: Vec<TradeEntry>,
    pub created_at: DateTime<Utc>,
}

impl Strategy {
    /// Create an empty strategy. The name is trimmed; a missing or
    /// non-positive balance falls back to [`DEFAULT_STARTING_BALANCE`].
    pub fn new(
        id: StrategyId,
        name: &str,
        starting_balance: Option<f64>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StrategyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StrategyError::EmptyName);
        }
        let starting_balance = starting_balance
            .filter(|b| b.is_finite() && *b > 0.0)
            .unwrap_or(DEFAULT_STARTING_BALANCE);
        Ok(Self {
            id,
            name: name.to_string(),
            starting_balance,
            trades: Vec::new(),
            created_at,
        })
    }

    pub fn trade(&self, id: &TradeId) -> Option<&TradeEntry> {
        self.trades.iter().find(|t| &t.id == id)
    }

    /// Insert at the front, matching newest-first order.
    pub fn add_trade(&mut self, entry: TradeEntry) -> Result<(), StrategyError> {
        if self.trade(&entry.id).is_some() {
            return Err(StrategyError::DuplicateTrade(entry.id));
        }
        self.trades.insert(0, entry);
        Ok(())
    }

    /// Replace the trade with the same id in place.
    pub fn replace_trade(&mut self, entry: TradeEntry) -> Result<(), StrategyError> {
        let slot = self
            .trades
            .iter_mut()
            .find(|t| t.id == entry.id)
            .ok_or_else(|| StrategyError::TradeNotFound(entry.id.clone()))?;
        *slot = entry;
        Ok(())
    }

    pub fn remove_trade(&mut self, id: &TradeId) -> Result<TradeEntry, StrategyError> {
        let pos = self
            .trades
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StrategyError::TradeNotFound(id.clone()))?;
        Ok(self.trades.remove(pos))
    }

    pub fn actual_trades(&self) -> impl Iterator<Item = &TradeEntry> {
        self.trades.iter().filter(|t| t.is_actual())
    }

    pub fn net_pl(&self) -> f64 {
        self.actual_trades().map(|t| t.profit_loss).sum()
    }

    pub fn current_balance(&self) -> f64 {
        self.starting_balance + self.net_pl()
    }
}

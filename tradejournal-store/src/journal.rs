//! The journal book: every strategy plus the current selection.
//!
//! Trade operations always target the current strategy. Deleting the
//! current strategy moves the selection to the first remaining one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use tradejournal_core::domain::{
    DraftError, Strategy, StrategyError, StrategyId, TradeDraft, TradeEntry, TradeId,
};

use crate::store::SCHEMA_VERSION;

#[derive(Debug, Error, PartialEq)]
pub enum JournalError {
    #[error("no strategy selected; create one first")]
    NoStrategy,

    #[error("strategy {0} not found")]
    UnknownStrategy(StrategyId),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("invalid trade: {0}")]
    Draft(#[from] DraftError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub strategies: BTreeMap<StrategyId, Strategy>,
    #[serde(default)]
    pub current_strategy: Option<StrategyId>,
}

impl Default for Journal {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            strategies: BTreeMap::new(),
            current_strategy: None,
        }
    }
}

impl Journal {
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Point the selection at an existing strategy: the saved one if it is
    /// still present, otherwise the first.
    pub fn repair_selection(&mut self) {
        let valid = self
            .current_strategy
            .as_ref()
            .is_some_and(|id| self.strategies.contains_key(id));
        if !valid {
            self.current_strategy = self.strategies.keys().next().cloned();
        }
    }

    pub fn current(&self) -> Option<&Strategy> {
        self.current_strategy.as_ref().and_then(|id| self.strategies.get(id))
    }

    fn current_mut(&mut self) -> Result<&mut Strategy, JournalError> {
        let id = self.current_strategy.as_ref().ok_or(JournalError::NoStrategy)?;
        self.strategies.get_mut(id).ok_or(JournalError::NoStrategy)
    }

    pub fn strategy(&self, id: &StrategyId) -> Option<&Strategy> {
        self.strategies.get(id)
    }

    /// Create a strategy and make it current.
    pub fn create_strategy(
        &mut self,
        name: &str,
        starting_balance: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<StrategyId, JournalError> {
        let millis = unique_millis(now, |m| {
            self.strategies.contains_key(&StrategyId::from_millis(m))
        });
        let id = StrategyId::from_millis(millis);
        let strategy = Strategy::new(id.clone(), name, starting_balance, now)?;
        info!(strategy = %id, name = %strategy.name, balance = strategy.starting_balance, "created strategy");
        self.strategies.insert(id.clone(), strategy);
        self.current_strategy = Some(id.clone());
        Ok(id)
    }

    /// Insert an imported strategy under a fresh id when its own is taken.
    pub fn import_strategy(&mut self, mut strategy: Strategy, now: DateTime<Utc>) -> StrategyId {
        if self.strategies.contains_key(&strategy.id) {
            let millis = unique_millis(now, |m| {
                self.strategies.contains_key(&StrategyId::from_millis(m))
            });
            strategy.id = StrategyId::from_millis(millis);
        }
        let id = strategy.id.clone();
        self.strategies.insert(id.clone(), strategy);
        if self.current_strategy.is_none() {
            self.current_strategy = Some(id.clone());
        }
        id
    }

    pub fn switch_strategy(&mut self, id: &StrategyId) -> Result<(), JournalError> {
        if !self.strategies.contains_key(id) {
            return Err(JournalError::UnknownStrategy(id.clone()));
        }
        debug!(strategy = %id, "switched strategy");
        self.current_strategy = Some(id.clone());
        Ok(())
    }

    pub fn delete_strategy(&mut self, id: &StrategyId) -> Result<Strategy, JournalError> {
        let removed = self
            .strategies
            .remove(id)
            .ok_or_else(|| JournalError::UnknownStrategy(id.clone()))?;
        if self.current_strategy.as_ref() == Some(id) {
            self.current_strategy = self.strategies.keys().next().cloned();
        }
        info!(strategy = %id, trades = removed.trades.len(), "deleted strategy");
        Ok(removed)
    }

    /// Log a new trade in the current strategy.
    pub fn add_trade(&mut self, draft: TradeDraft, now: DateTime<Utc>) -> Result<TradeId, JournalError> {
        let strategy = self.current_mut()?;
        let millis = unique_millis(now, |m| strategy.trade(&TradeId::from_millis(m)).is_some());
        let id = TradeId::from_millis(millis);
        let entry = draft.into_entry(id.clone(), now)?;
        debug!(trade = %id, symbol = %entry.symbol, pl = entry.profit_loss, "added trade");
        strategy.add_trade(entry)?;
        Ok(id)
    }

    /// Replace a trade from an edited draft, keeping its id and creation time.
    pub fn edit_trade(&mut self, id: &TradeId, draft: TradeDraft) -> Result<&TradeEntry, JournalError> {
        let strategy = self.current_mut()?;
        let created_at = strategy
            .trade(id)
            .map(|t| t.created_at)
            .ok_or_else(|| StrategyError::TradeNotFound(id.clone()))?;
        let entry = draft.into_entry(id.clone(), created_at)?;
        debug!(trade = %id, pl = entry.profit_loss, "edited trade");
        strategy.replace_trade(entry)?;
        Ok(strategy.trade(id).ok_or_else(|| StrategyError::TradeNotFound(id.clone()))?)
    }

    pub fn delete_trade(&mut self, id: &TradeId) -> Result<TradeEntry, JournalError> {
        let removed = self.current_mut()?.remove_trade(id)?;
        debug!(trade = %id, "deleted trade");
        Ok(removed)
    }
}

/// Millisecond timestamp of `now`, bumped forward until `taken` rejects it.
fn unique_millis(now: DateTime<Utc>, taken: impl Fn(i64) -> bool) -> i64 {
    let mut millis = now.timestamp_millis();
    while taken(millis) {
        millis += 1;
    }
    millis
}

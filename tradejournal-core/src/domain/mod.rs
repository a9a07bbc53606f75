//! Journal domain types.

pub mod ids;
pub mod strategy;
pub mod trade;

pub use ids::{StrategyId, TradeId};
pub use strategy::{Strategy, StrategyError, DEFAULT_STARTING_BALANCE};
pub use trade::{DraftError, RiskReward, TradeDraft, TradeEntry, NO_TRADE_SYMBOL};

pub use crate::pricing::Direction;

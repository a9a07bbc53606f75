//! Filtering, searching and sorting of a trade list.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::TradeEntry;
use crate::pricing::Direction;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DirectionFilter {
    #[default]
    All,
    Buy,
    Sell,
}

impl DirectionFilter {
    pub fn matches(self, direction: Direction) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Buy => direction == Direction::Buy,
            DirectionFilter::Sell => direction == Direction::Sell,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    PlDesc,
    PlAsc,
}

impl SortOrder {
    fn compare(self, a: &TradeEntry, b: &TradeEntry) -> Ordering {
        match self {
            SortOrder::DateDesc => b.date.cmp(&a.date),
            SortOrder::DateAsc => a.date.cmp(&b.date),
            SortOrder::PlDesc => b.profit_loss.total_cmp(&a.profit_loss),
            SortOrder::PlAsc => a.profit_loss.total_cmp(&b.profit_loss),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseQueryError {
    kind: &'static str,
    value: String,
}

impl FromStr for DirectionFilter {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(DirectionFilter::All),
            "BUY" => Ok(DirectionFilter::Buy),
            "SELL" => Ok(DirectionFilter::Sell),
            _ => Err(ParseQueryError { kind: "direction filter", value: s.into() }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            "pl-desc" => Ok(SortOrder::PlDesc),
            "pl-asc" => Ok(SortOrder::PlAsc),
            _ => Err(ParseQueryError { kind: "sort order", value: s.into() }),
        }
    }
}

/// List view query: direction filter, free-text search, sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeQuery {
    pub direction: DirectionFilter,
    /// Case-insensitive substring matched against symbol and notes.
    pub search: String,
    pub sort: SortOrder,
}

impl TradeQuery {
    pub fn matches(&self, trade: &TradeEntry) -> bool {
        if !self.direction.matches(trade.direction) {
            return false;
        }
        let needle = self.search.to_lowercase();
        trade.symbol.to_lowercase().contains(&needle)
            || trade.notes.to_lowercase().contains(&needle)
    }

    /// Matching trades in the requested order. Ties keep their stored order.
    pub fn apply<'a>(&self, trades: &'a [TradeEntry]) -> Vec<&'a TradeEntry> {
        let mut out: Vec<&TradeEntry> = trades.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TradeDraft, TradeId};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn trade(id: &str, day: u32, symbol: &str, dir: Direction, exit: &str, notes: &str) -> TradeEntry {
        TradeDraft {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            symbol: symbol.into(),
            direction: dir,
            lot_size: "1".into(),
            entry_price: "100".into(),
            exit_price: exit.into(),
            notes: notes.into(),
            ..TradeDraft::default()
        }
        .into_entry(TradeId::new(id), Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        .unwrap()
    }

    fn sample() -> Vec<TradeEntry> {
        vec![
            trade("1", 3, "US30", Direction::Buy, "120", "breakout"),
            trade("2", 1, "NAS100", Direction::Sell, "90", "fade the open"),
            trade("3", 2, "US30", Direction::Sell, "105", "Breakout failed"),
        ]
    }

    fn ids(trades: &[&TradeEntry]) -> Vec<String> {
        trades.iter().map(|t| t.id.0.clone()).collect()
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let trades = sample();
        assert_eq!(ids(&TradeQuery::default().apply(&trades)), ["1", "3", "2"]);
    }

    #[test]
    fn direction_and_search_combine() {
        let trades = sample();
        let q = TradeQuery {
            direction: DirectionFilter::Sell,
            search: "BREAKOUT".into(),
            sort: SortOrder::DateAsc,
        };
        assert_eq!(ids(&q.apply(&trades)), ["3"]);

        let q = TradeQuery { search: "nas".into(), ..TradeQuery::default() };
        assert_eq!(ids(&q.apply(&trades)), ["2"]);
    }

    #[test]
    fn pl_sorting() {
        let trades = sample();
        // P/L: 1 → +20, 2 → +10, 3 → -5
        let q = TradeQuery { sort: SortOrder::PlDesc, ..TradeQuery::default() };
        assert_eq!(ids(&q.apply(&trades)), ["1", "2", "3"]);
        let q = TradeQuery { sort: SortOrder::PlAsc, ..TradeQuery::default() };
        assert_eq!(ids(&q.apply(&trades)), ["3", "2", "1"]);
    }

    #[test]
    fn parse_labels() {
        assert_eq!("buy".parse::<DirectionFilter>(), Ok(DirectionFilter::Buy));
        assert_eq!("pl-asc".parse::<SortOrder>(), Ok(SortOrder::PlAsc));
        assert!("newest".parse::<SortOrder>().is_err());
    }
}

//! Journal statistics: pure functions over a strategy's trade list.
//!
//! No-trade day markers never count as trades. Break-even trades count
//! towards totals but neither win nor lose.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

use crate::calendar::YearMonth;
use crate::domain::TradeEntry;

/// Totals shown above the trade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub total_trades: usize,
    /// Sum of winning P/L.
    pub total_profit: f64,
    /// Sum of losing P/L as a positive number.
    pub total_loss: f64,
    pub net_pl: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage, 0-100.
    pub win_rate: f64,
}

impl JournalSummary {
    pub fn compute(trades: &[TradeEntry]) -> Self {
        let actual: Vec<&TradeEntry> = actual_trades(trades).collect();
        let total_trades = actual.len();
        let winning_trades = actual.iter().filter(|t| t.is_winner()).count();
        Self {
            total_trades,
            total_profit: gross_profit(&actual),
            total_loss: gross_loss(&actual),
            net_pl: actual.iter().map(|t| t.profit_loss).sum(),
            winning_trades,
            losing_trades: actual.iter().filter(|t| t.is_loser()).count(),
            win_rate: percentage(winning_trades, total_trades),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub profit: f64,
    /// Distinct trading days in the month.
    pub days: usize,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown date range '{0}' (expected all, today, week, month or year)")]
pub struct ParseDateRangeError(String);

/// Dashboard date filter, relative to a reference "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// ISO week (Monday to Sunday) containing today.
    Week,
    Month,
    Year,
}

impl DateRange {
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Today => date == today,
            DateRange::Week => date.iso_week() == today.iso_week(),
            DateRange::Month => YearMonth::of(date) == YearMonth::of(today),
            DateRange::Year => date.year() == today.year(),
        }
    }
}

impl FromStr for DateRange {
    type Err = ParseDateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            _ => Err(ParseDateRangeError(s.to_string())),
        }
    }
}

/// Dashboard figures for one strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub net_pl: f64,
    /// Gross profit / gross loss; equals gross profit when there are no losses.
    pub profit_factor: f64,
    /// Run of consecutive wins or losses ending at the most recent trade.
    pub current_streak: Streak,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub monthly: MonthlyStats,
    /// Percentage, 0-100.
    pub trade_win_rate: f64,
    /// Average P/L per trade.
    pub trade_expectancy: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub starting_balance: f64,
    /// Starting balance plus P/L of every trade, regardless of range.
    pub current_balance: f64,
}

impl DashboardStats {
    /// Compute over the trades inside `range`; the monthly block covers
    /// `month` within that selection.
    pub fn compute(
        trades: &[TradeEntry],
        starting_balance: f64,
        range: DateRange,
        month: YearMonth,
        today: NaiveDate,
    ) -> Self {
        let lifetime_pl: f64 = actual_trades(trades).map(|t| t.profit_loss).sum();
        let current_balance = starting_balance + lifetime_pl;

        let mut selected: Vec<&TradeEntry> = actual_trades(trades)
            .filter(|t| range.contains(t.date, today))
            .collect();
        if selected.is_empty() {
            return Self { starting_balance, current_balance, ..Self::default() };
        }
        // Oldest first, so the final run is the current streak.
        selected.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        let total_trades = selected.len();
        let winning_trades = selected.iter().filter(|t| t.is_winner()).count();
        let net_pl: f64 = selected.iter().map(|t| t.profit_loss).sum();
        let total_profit = gross_profit(&selected);
        let total_loss = gross_loss(&selected);

        Self {
            net_pl,
            profit_factor: if total_loss == 0.0 { total_profit } else { total_profit / total_loss },
            current_streak: current_streak(&selected),
            max_consecutive_wins: max_consecutive(&selected, StreakKind::Win),
            max_consecutive_losses: max_consecutive(&selected, StreakKind::Loss),
            monthly: monthly_stats(&selected, month),
            trade_win_rate: percentage(winning_trades, total_trades),
            trade_expectancy: net_pl / total_trades as f64,
            total_trades,
            winning_trades,
            losing_trades: selected.iter().filter(|t| t.is_loser()).count(),
            starting_balance,
            current_balance,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn actual_trades(trades: &[TradeEntry]) -> impl Iterator<Item = &TradeEntry> {
    trades.iter().filter(|t| t.is_actual())
}

fn gross_profit(trades: &[&TradeEntry]) -> f64 {
    trades.iter().map(|t| t.profit_loss).filter(|pl| *pl > 0.0).sum()
}

fn gross_loss(trades: &[&TradeEntry]) -> f64 {
    trades.iter().map(|t| t.profit_loss).filter(|pl| *pl < 0.0).map(f64::abs).sum()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn outcome(trade: &TradeEntry) -> StreakKind {
    if trade.is_winner() {
        StreakKind::Win
    } else if trade.is_loser() {
        StreakKind::Loss
    } else {
        StreakKind::None
    }
}

/// Walks trades in order; break-even trades leave the streak untouched.
fn current_streak(trades: &[&TradeEntry]) -> Streak {
    let mut streak = Streak::default();
    for trade in trades {
        match outcome(trade) {
            StreakKind::None => {}
            kind if kind == streak.kind => streak.count += 1,
            kind => streak = Streak { kind, count: 1 },
        }
    }
    streak
}

fn max_consecutive(trades: &[&TradeEntry], kind: StreakKind) -> usize {
    let mut max_streak = 0;
    let mut current = 0;

    for trade in trades {
        match outcome(trade) {
            StreakKind::None => {}
            k if k == kind => {
                current += 1;
                max_streak = max_streak.max(current);
            }
            _ => current = 0,
        }
    }
    max_streak
}

fn monthly_stats(trades: &[&TradeEntry], month: YearMonth) -> MonthlyStats {
    let in_month: Vec<&&TradeEntry> = trades.iter().filter(|t| month.contains(t.date)).collect();
    let days: BTreeSet<NaiveDate> = in_month.iter().map(|t| t.date).collect();
    MonthlyStats {
        profit: in_month.iter().map(|t| t.profit_loss).sum(),
        days: days.len(),
    }
}

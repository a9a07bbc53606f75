//! Month calendar of daily P/L (the heat-map view).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::TradeEntry;

#[derive(Debug, Error, PartialEq)]
pub enum CalendarError {
    #[error("invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),
}

/// A calendar month. Always within chrono's representable date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    /// 1-based.
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year, self.month, day).is_some())
            .unwrap_or(28)
    }

    /// `None` past the last representable month.
    pub fn next(&self) -> Option<Self> {
        match self.month {
            12 => Self::new(self.year.checked_add(1)?, 1).ok(),
            month => Self::new(self.year, month + 1).ok(),
        }
    }

    /// `None` before the first representable month.
    pub fn prev(&self) -> Option<Self> {
        match self.month {
            1 => Self::new(self.year.checked_sub(1)?, 12).ok(),
            month => Self::new(self.year, month - 1).ok(),
        }
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(month: YearMonth) -> Self {
        month.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

/// Colour of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayTone {
    Positive,
    Negative,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    /// Entries logged that day, no-trade markers included.
    pub trade_count: usize,
    pub pl: f64,
}

impl DayCell {
    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }

    pub fn tone(&self) -> DayTone {
        if self.pl > 0.0 {
            DayTone::Positive
        } else if self.pl < 0.0 {
            DayTone::Negative
        } else {
            DayTone::Flat
        }
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

/// Sunday-first month grid: `leading_blanks` empty cells, then one cell per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub month: YearMonth,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl MonthCalendar {
    pub fn build(month: YearMonth, trades: &[TradeEntry]) -> Self {
        let leading_blanks = month.first_day().weekday().num_days_from_sunday();
        let days = (1..=month.days_in_month())
            .filter_map(|day| NaiveDate::from_ymd_opt(month.year, month.month, day))
            .map(|date| {
                let (trade_count, pl) = trades
                    .iter()
                    .filter(|t| t.date == date)
                    .fold((0, 0.0), |(n, pl), t| (n + 1, pl + t.profit_loss));
                DayCell { day: date.day(), date, trade_count, pl }
            })
            .collect();
        Self { month, leading_blanks, days }
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days.get(day.checked_sub(1)? as usize)
    }

    pub fn month_pl(&self) -> f64 {
        self.days.iter().map(|d| d.pl).sum()
    }

    /// Rows of seven optional cells, padded at both ends.
    pub fn weeks(&self) -> Vec<[Option<&DayCell>; 7]> {
        let mut cells: Vec<Option<&DayCell>> = (0..self.leading_blanks).map(|_| None).collect();
        cells.extend(self.days.iter().map(Some));
        cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                for (slot, cell) in week.iter_mut().zip(chunk) {
                    *slot = *cell;
                }
                week
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TradeDraft, TradeId};
    use crate::pricing::Direction;
    use chrono::{TimeZone, Utc};

    fn trade(date: NaiveDate, exit: &str) -> TradeEntry {
        TradeDraft {
            date,
            symbol: "US30".into(),
            direction: Direction::Buy,
            lot_size: "1".into(),
            entry_price: "100".into(),
            exit_price: exit.into(),
            ..TradeDraft::default()
        }
        .into_entry(TradeId::new("x"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_and_navigate() {
        let m: YearMonth = "2024-12".parse().unwrap();
        assert_eq!(m.next(), Some(YearMonth::new(2025, 1).unwrap()));
        assert_eq!(m.next().and_then(|n| n.prev()), Some(m));
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.prev().unwrap().to_string(), "2023-12");
        assert_eq!((jan.year(), jan.month()), (2024, 1));
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn last_representable_month_is_bounded() {
        let last = YearMonth::of(NaiveDate::MAX);
        assert_eq!(last.days_in_month(), NaiveDate::MAX.day());
        assert_eq!(last.next(), None);
        assert!(last.prev().is_some());
        assert_eq!(MonthCalendar::build(last, &[]).days.len() as u32, last.days_in_month());

        let first = YearMonth::of(NaiveDate::MIN);
        assert_eq!(first.prev(), None);
        assert!(YearMonth::new(NaiveDate::MAX.year() + 1, 1).is_err());
    }

    #[test]
    fn out_of_range_months_are_rejected_on_deserialize() {
        let month: YearMonth = serde_json::from_str("\"2024-06\"").unwrap();
        assert_eq!(month, YearMonth::new(2024, 6).unwrap());
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-06\"");
        assert!(serde_json::from_str::<YearMonth>("\"2024-13\"").is_err());
        assert!(serde_json::from_str::<YearMonth>("\"999999-01\"").is_err());
    }

    #[test]
    fn grid_layout_starts_on_weekday_of_first() {
        // 1 June 2024 is a Saturday.
        let cal = MonthCalendar::build(YearMonth::new(2024, 6).unwrap(), &[]);
        assert_eq!(cal.leading_blanks, 6);
        assert_eq!(cal.days.len(), 30);
        let weeks = cal.weeks();
        assert_eq!(weeks.len(), 6);
        assert!(weeks[0][5].is_none());
        assert_eq!(weeks[0][6].map(|c| c.day), Some(1));
    }

    #[test]
    fn daily_pl_aggregates_per_date() {
        let trades = vec![
            trade(d(2024, 6, 3), "110"),
            trade(d(2024, 6, 3), "95"),
            trade(d(2024, 6, 4), "90"),
            trade(d(2024, 7, 3), "200"),
        ];
        let cal = MonthCalendar::build(YearMonth::new(2024, 6).unwrap(), &trades);
        let third = cal.day(3).unwrap();
        assert_eq!(third.trade_count, 2);
        assert_eq!(third.pl, 5.0);
        assert_eq!(third.tone(), DayTone::Positive);
        assert_eq!(cal.day(4).unwrap().tone(), DayTone::Negative);
        assert_eq!(cal.day(5).unwrap().tone(), DayTone::Flat);
        assert!(!cal.day(5).unwrap().has_trades());
        assert_eq!(cal.month_pl(), -5.0);
        assert!(cal.day(0).is_none());
        assert!(cal.day(3).unwrap().is_today(d(2024, 6, 3)));
    }
}

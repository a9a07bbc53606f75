//! Trade Journal Core: pricing engine and journal domain.
//!
//! This crate is pure (no I/O):
//! - Pricing: symbol normalization, instrument table, P/L, pip value, price formatting
//! - Pair catalog with search
//! - Journal entries and strategies
//! - List queries (filter, search, sort)
//! - Dashboard statistics and the monthly P/L calendar

pub mod calendar;
pub mod catalog;
pub mod domain;
pub mod pricing;
pub mod query;
pub mod stats;

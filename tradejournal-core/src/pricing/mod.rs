//! Pricing engine: symbol normalization, instrument table, P/L and pip value.
//!
//! All functions are stateless and safe to call from any thread.

pub mod calculator;
pub mod direction;
pub mod instrument;
pub mod symbol;

pub use calculator::{compute_pip_value, compute_pl, format_price, is_open_exit};
pub use direction::{Direction, ParseDirectionError};
pub use instrument::{
    classify, describe, lookup, InstrumentConfig, InstrumentKind, PairInfo, DEFAULT_CONFIG,
};
pub use symbol::normalize;

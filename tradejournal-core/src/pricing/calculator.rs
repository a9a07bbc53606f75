//! Profit/loss, pip value and price formatting.
//!
//! Every function here is pure: normalized symbol + numbers in, number or
//! string out. Malformed numbers are not validated; NaN inputs propagate
//! through the arithmetic (except a NaN exit price, which reads as "open").

use super::direction::Direction;
use super::instrument::{classify, config_or_default, is_jpy_quoted, lookup, InstrumentKind};
use super::symbol::normalize;

const GOLD_OZ_PER_LOT: f64 = 100.0;
const SILVER_OZ_PER_LOT: f64 = 5_000.0;
const STANDARD_LOT_UNITS: f64 = 100_000.0;
const DEFAULT_PRICE_DECIMALS: usize = 5;

/// Formula family for P/L. JPY-quoted pairs split off from forex here
/// (after the metals, before indices and crypto).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlRule {
    Gold,
    Silver,
    JpyQuoted,
    PointValue,
    StandardForex,
}

fn pl_rule(normalized: &str) -> PlRule {
    match classify(normalized) {
        InstrumentKind::Gold => PlRule::Gold,
        InstrumentKind::Silver => PlRule::Silver,
        _ if is_jpy_quoted(normalized) => PlRule::JpyQuoted,
        InstrumentKind::Index | InstrumentKind::Crypto => PlRule::PointValue,
        InstrumentKind::ForexPair => PlRule::StandardForex,
    }
}

/// Whether an exit price marks the trade as still open: missing, zero or NaN.
pub fn is_open_exit(exit_price: Option<f64>) -> bool {
    exit_price.map_or(true, |price| price == 0.0 || price.is_nan())
}

/// Signed USD profit/loss of a trade.
///
/// A zero, missing or NaN exit price means the trade is still open and
/// yields `0.0`.
pub fn compute_pl(
    symbol: &str,
    lot_size: f64,
    entry_price: f64,
    exit_price: impl Into<Option<f64>>,
    direction: Direction,
) -> f64 {
    let exit_price = match exit_price.into() {
        Some(price) if !is_open_exit(Some(price)) => price,
        _ => return 0.0,
    };

    let normalized = normalize(symbol);
    let price_diff = direction.price_diff(entry_price, exit_price);

    match pl_rule(&normalized) {
        PlRule::Gold => price_diff * lot_size * GOLD_OZ_PER_LOT,
        PlRule::Silver => price_diff * lot_size * SILVER_OZ_PER_LOT,
        PlRule::JpyQuoted => {
            let contract_size = config_or_default(&normalized).contract_size;
            let pip_value = (0.01 / entry_price) * contract_size * lot_size;
            price_diff * pip_value * 100.0
        }
        PlRule::PointValue => price_diff * lot_size,
        PlRule::StandardForex => price_diff * lot_size * STANDARD_LOT_UNITS,
    }
}

/// USD value of a one-pip move at `lot_size`.
///
/// Indices and crypto use the generic `contract_size * 0.0001` rule here,
/// unlike [`compute_pl`] which prices them per point.
pub fn compute_pip_value(symbol: &str, lot_size: f64) -> f64 {
    let normalized = normalize(symbol);
    let config = config_or_default(&normalized);

    match classify(&normalized) {
        InstrumentKind::Gold => GOLD_OZ_PER_LOT * lot_size,
        InstrumentKind::Silver => SILVER_OZ_PER_LOT * lot_size,
        _ if is_jpy_quoted(&normalized) => (config.contract_size * lot_size) / 100.0,
        _ => (config.contract_size * lot_size) * 0.0001,
    }
}

/// Render `price` with the instrument's pip precision (5 decimals when the
/// symbol is unknown).
///
/// Rounds like JavaScript's `toFixed`: to the nearest value of the exact
/// binary price, with exact ties going away from zero.
pub fn format_price(symbol: &str, price: f64) -> String {
    let decimals = lookup(&normalize(symbol))
        .map(|config| config.pip_position as usize)
        .unwrap_or(DEFAULT_PRICE_DECIMALS);
    to_fixed(price, decimals)
}

fn to_fixed(price: f64, decimals: usize) -> String {
    if price.is_nan() {
        return "NaN".into();
    }
    if price.is_infinite() {
        return if price > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if price == 0.0 {
        return format!("{:.decimals$}", 0.0);
    }
    match round_tie_up(price.abs(), decimals) {
        Some(units) => {
            let sign = if price < 0.0 { "-" } else { "" };
            let digits = format!("{units:0>width$}", width = decimals + 1);
            let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
            if decimals == 0 {
                format!("{sign}{int_part}")
            } else {
                format!("{sign}{int_part}.{frac_part}")
            }
        }
        // `{:.N}` rounds the exact binary value, so only exact ties differ.
        None => format!("{price:.decimals$}"),
    }
}

/// If `magnitude * 10^decimals` lies exactly halfway between two integers,
/// return the upper one.
fn round_tie_up(magnitude: f64, decimals: usize) -> Option<u128> {
    const MANTISSA_BITS: u32 = 52;
    const EXPONENT_BIAS: i32 = 1075;

    let bits = magnitude.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << MANTISSA_BITS) - 1);
    // magnitude == mantissa * 2^exponent
    let (mantissa, exponent) = if biased == 0 {
        (fraction, 1 - EXPONENT_BIAS)
    } else {
        (fraction | (1u64 << MANTISSA_BITS), biased - EXPONENT_BIAS)
    };
    if exponent >= 0 {
        return None;
    }

    let scale = 10u128.checked_pow(u32::try_from(decimals).ok()?)?;
    let scaled = u128::from(mantissa).checked_mul(scale)?;
    let shift = exponent.unsigned_abs();
    // A half remainder means exactly `shift - 1` trailing zero bits.
    if shift > 127 || scaled.trailing_zeros() != shift - 1 {
        return None;
    }
    Some((scaled >> shift) + 1)
}

//! Property tests for calculator invariants.
//!
//! Uses proptest to verify:
//! 1. Open trades price at zero for every instrument
//! 2. Buy and sell P/L are exact negatives
//! 3. Separators and case in the symbol never change a result
//! 4. Repeated calls are bit-identical

use proptest::prelude::*;
use tradejournal_core::pricing::{
    compute_pip_value, compute_pl, describe, format_price, normalize, Direction,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbol() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("EURUSD".to_string()),
        Just("USDJPY".to_string()),
        Just("GBPJPY".to_string()),
        Just("XAUUSD".to_string()),
        Just("XAGUSD".to_string()),
        Just("US30".to_string()),
        Just("GER40".to_string()),
        Just("BTCUSD".to_string()),
        "[A-Z]{6}",
    ]
}

fn arb_lot() -> impl Strategy<Value = f64> {
    (1u32..10_000).prop_map(|n| n as f64 / 100.0)
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.5..50_000.0_f64).prop_map(|p| (p * 10_000.0).round() / 10_000.0)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Buy), Just(Direction::Sell)]
}

/// Insert separators and lowercase some letters.
fn scramble(symbol: &str, seed: u64) -> String {
    symbol
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let bit = (seed >> (i % 64)) & 1 == 1;
            if bit {
                format!("{}/", c.to_ascii_lowercase())
            } else {
                c.to_string()
            }
        })
        .collect()
}

// ── 1. Open trade sentinel ───────────────────────────────────────────

proptest! {
    #[test]
    fn open_trade_has_zero_pl(
        symbol in arb_symbol(),
        lot in arb_lot(),
        entry in arb_price(),
        dir in arb_direction(),
    ) {
        prop_assert_eq!(compute_pl(&symbol, lot, entry, 0.0, dir), 0.0);
        prop_assert_eq!(compute_pl(&symbol, lot, entry, None, dir), 0.0);
    }
}

// ── 2. Direction symmetry ────────────────────────────────────────────

proptest! {
    #[test]
    fn buy_is_negated_sell(
        symbol in arb_symbol(),
        lot in arb_lot(),
        entry in arb_price(),
        exit in arb_price(),
    ) {
        prop_assume!(exit != entry);
        let buy = compute_pl(&symbol, lot, entry, exit, Direction::Buy);
        let sell = compute_pl(&symbol, lot, entry, exit, Direction::Sell);
        prop_assert_eq!(buy, -sell);
    }

    #[test]
    fn winning_buy_is_positive(
        symbol in arb_symbol(),
        lot in arb_lot(),
        entry in arb_price(),
        bump in 0.01..100.0_f64,
    ) {
        let pl = compute_pl(&symbol, lot, entry, entry + bump, Direction::Buy);
        prop_assert!(pl > 0.0);
    }
}

// ── 3. Normalization ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn separators_and_case_are_ignored(
        symbol in arb_symbol(),
        seed in any::<u64>(),
        lot in arb_lot(),
        entry in arb_price(),
        exit in arb_price(),
        dir in arb_direction(),
    ) {
        let messy = scramble(&symbol, seed);
        prop_assert_eq!(normalize(&messy), symbol.clone());
        prop_assert_eq!(
            compute_pl(&messy, lot, entry, exit, dir).to_bits(),
            compute_pl(&symbol, lot, entry, exit, dir).to_bits()
        );
        prop_assert_eq!(
            compute_pip_value(&messy, lot).to_bits(),
            compute_pip_value(&symbol, lot).to_bits()
        );
        prop_assert_eq!(format_price(&messy, entry), format_price(&symbol, entry));
    }
}

// ── 4. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn repeated_calls_are_identical(
        symbol in arb_symbol(),
        lot in arb_lot(),
        entry in arb_price(),
        exit in arb_price(),
        dir in arb_direction(),
    ) {
        let a = compute_pl(&symbol, lot, entry, exit, dir);
        let b = compute_pl(&symbol, lot, entry, exit, dir);
        prop_assert_eq!(a.to_bits(), b.to_bits());
        prop_assert_eq!(describe(&symbol), describe(&symbol));
        prop_assert_eq!(format_price(&symbol, exit), format_price(&symbol, exit));
    }

    #[test]
    fn pip_value_scales_linearly_with_lots(symbol in arb_symbol(), lot in arb_lot()) {
        let one = compute_pip_value(&symbol, lot);
        let two = compute_pip_value(&symbol, lot * 2.0);
        prop_assert!((two - 2.0 * one).abs() <= 1e-9 * two.abs().max(1.0));
    }
}

//! Export: trade tape as CSV, a single strategy as portable JSON.
//!
//! Strategy exports carry a `schemaVersion`; newer versions are rejected on
//! import.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tradejournal_core::domain::{Strategy, TradeEntry};

use crate::store::SCHEMA_VERSION;

// ─── CSV export ─────────────────────────────────────────────────────

/// Export trades as CSV, in the order given.
///
/// Columns: id, date, symbol, type, lot_size, entry_price, exit_price,
/// profit_loss, pip_value, risk_reward, no_trade, notes
pub fn export_trades_csv(trades: &[TradeEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "date",
        "symbol",
        "type",
        "lot_size",
        "entry_price",
        "exit_price",
        "profit_loss",
        "pip_value",
        "risk_reward",
        "no_trade",
        "notes",
    ])?;

    for t in trades {
        let exit = if t.is_open() {
            String::new()
        } else {
            t.exit_price.to_string()
        };
        wtr.write_record([
            t.id.to_string(),
            t.date.to_string(),
            t.symbol.clone(),
            t.direction.to_string(),
            t.lot_size.to_string(),
            t.entry_price.to_string(),
            exit,
            format!("{:.2}", t.profit_loss),
            format!("{:.2}", t.pip_value),
            t.risk_reward_ratio.clone().unwrap_or_default(),
            t.is_no_trade.to_string(),
            t.notes.clone(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Strategy JSON ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrategyExport {
    schema_version: u32,
    strategy: Strategy,
}

/// Serialize one strategy with its trades to pretty JSON.
pub fn export_strategy_json(strategy: &Strategy) -> Result<String> {
    let doc = StrategyExport {
        schema_version: SCHEMA_VERSION,
        strategy: strategy.clone(),
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize strategy to JSON")
}

/// Parse a strategy export. Cached P/L and pip values are recomputed so a
/// hand-edited file cannot carry stale numbers.
pub fn import_strategy_json(json: &str) -> Result<Strategy> {
    let doc: StrategyExport =
        serde_json::from_str(json).context("failed to deserialize strategy from JSON")?;
    if doc.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            doc.schema_version,
            SCHEMA_VERSION
        );
    }
    let mut strategy = doc.strategy;
    if strategy.name.trim().is_empty() {
        bail!("imported strategy has no name");
    }
    for trade in &mut strategy.trades {
        trade.recompute();
    }
    debug!(strategy = %strategy.id, trades = strategy.trades.len(), "imported strategy");
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tradejournal_core::domain::{Direction, StrategyId, TradeDraft, TradeId};

    fn sample_strategy() -> Strategy {
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap();
        let mut s = Strategy::new(StrategyId::new("1"), "Breakouts", None, now).unwrap();
        let closed = TradeDraft {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            symbol: "USDJPY".into(),
            direction: Direction::Sell,
            lot_size: "1".into(),
            entry_price: "150.00".into(),
            exit_price: "149.50".into(),
            notes: "fade, then \"retest\"".into(),
            risk_reward_ratio: "1:3".into(),
            ..TradeDraft::default()
        };
        let open = TradeDraft {
            exit_price: String::new(),
            notes: String::new(),
            risk_reward_ratio: String::new(),
            ..closed.clone()
        };
        s.add_trade(closed.into_entry(TradeId::new("10"), now).unwrap()).unwrap();
        s.add_trade(open.into_entry(TradeId::new("11"), now).unwrap()).unwrap();
        s.add_trade(
            TradeDraft::no_trade(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(), "NFP")
                .into_entry(TradeId::new("12"), now)
                .unwrap(),
        )
        .unwrap();
        s
    }

    #[test]
    fn csv_has_header_and_one_row_per_trade() {
        let s = sample_strategy();
        let csv = export_trades_csv(&s.trades).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id,date,symbol,type,"));
        assert!(lines[1].starts_with("12,2024-06-04,NO-TRADE,BUY,"));
        // Open trade leaves exit_price blank.
        assert!(lines[2].contains(",150,,0.00,"));
        // 50 pips on 1 lot of USDJPY at 150.00 is 0.5 * (0.01 / 150 * 100000) * 100.
        assert!(lines[3].contains(",SELL,1,150,149.5,333.33,1000.00,1:3,false,"));
        assert!(lines[3].contains("1:3"));
        assert!(lines[3].ends_with("\"fade, then \"\"retest\"\"\""));
    }

    #[test]
    fn strategy_json_survives_export_and_import() {
        let s = sample_strategy();
        let json = export_strategy_json(&s).unwrap();
        assert!(json.contains("\"schemaVersion\""));
        assert_eq!(import_strategy_json(&json).unwrap(), s);
    }

    #[test]
    fn import_recomputes_cached_pl() {
        let s = sample_strategy();
        let mut doc: serde_json::Value =
            serde_json::from_str(&export_strategy_json(&s).unwrap()).unwrap();
        for trade in doc["strategy"]["trades"].as_array_mut().unwrap() {
            trade["profitLoss"] = serde_json::json!(123.0);
        }
        let imported = import_strategy_json(&doc.to_string()).unwrap();
        let closed = imported.trade(&TradeId::new("10")).unwrap();
        let expected = 0.5 * (0.01 / 150.0 * 100_000.0) * 100.0;
        assert!((closed.profit_loss - expected).abs() < 1e-6);
        assert_eq!(imported.trade(&TradeId::new("12")).unwrap().profit_loss, 0.0);
    }

    #[test]
    fn import_rejects_newer_schema() {
        let s = sample_strategy();
        let json = export_strategy_json(&s)
            .unwrap()
            .replace("\"schemaVersion\": 1", "\"schemaVersion\": 7");
        let err = import_strategy_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 7"));
    }
}

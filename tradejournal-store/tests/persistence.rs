//! Journal persistence across separate load/save cycles, as the CLI drives it:
//! every command loads the file, mutates the journal and saves it back.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use tradejournal_core::domain::{Direction, TradeDraft};
use tradejournal_core::stats::JournalSummary;
use tradejournal_store::{
    export_strategy_json, import_strategy_json, Journal, JournalStore, JOURNAL_FILE,
};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, hour, 0, 0).unwrap()
}

fn eurusd(exit: &str) -> TradeDraft {
    TradeDraft {
        date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        symbol: "EUR/USD".into(),
        direction: Direction::Buy,
        lot_size: "0.5".into(),
        entry_price: "1.0700".into(),
        exit_price: exit.into(),
        ..TradeDraft::default()
    }
}

/// Load, apply `f`, save.
fn session<T>(store: &JournalStore, f: impl FnOnce(&mut Journal) -> T) -> T {
    let mut journal = store.load().unwrap();
    let out = f(&mut journal);
    store.save(&journal).unwrap();
    out
}

#[test]
fn trades_survive_between_sessions() {
    let dir = TempDir::new().unwrap();
    let store = JournalStore::new(dir.path());

    let strategy = session(&store, |j| j.create_strategy("Swing", Some(2_000.0), at(8)).unwrap());
    let trade = session(&store, |j| j.add_trade(eurusd(""), at(9)).unwrap());
    session(&store, |j| {
        j.add_trade(TradeDraft::no_trade(NaiveDate::from_ymd_opt(2024, 4, 16).unwrap(), ""), at(10))
            .unwrap()
    });
    session(&store, |j| {
        j.edit_trade(&trade, eurusd("1.0750")).unwrap();
    });

    let journal = store.load().unwrap();
    assert_eq!(journal.current_strategy, Some(strategy));
    let current = journal.current().unwrap();
    assert_eq!(current.trades.len(), 2);
    let summary = JournalSummary::compute(&current.trades);
    assert_eq!(summary.total_trades, 1);
    assert!((summary.net_pl - 250.0).abs() < 1e-6);
    assert!((current.current_balance() - 2_250.0).abs() < 1e-6);
}

#[test]
fn deleting_last_strategy_removes_the_file() {
    let dir = TempDir::new().unwrap();
    let store = JournalStore::new(dir.path());
    let id = session(&store, |j| j.create_strategy("Scalps", None, at(8)).unwrap());
    assert!(dir.path().join(JOURNAL_FILE).exists());

    session(&store, |j| j.delete_strategy(&id).unwrap());
    assert!(!dir.path().join(JOURNAL_FILE).exists());
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn exported_strategy_imports_into_another_journal() {
    let src_dir = TempDir::new().unwrap();
    let dst_dir = TempDir::new().unwrap();
    let src = JournalStore::new(src_dir.path());
    let dst = JournalStore::new(dst_dir.path());

    let id = session(&src, |j| {
        let id = j.create_strategy("Shared", None, at(8)).unwrap();
        j.add_trade(eurusd("1.0650"), at(9)).unwrap();
        id
    });
    let json = export_strategy_json(src.load().unwrap().strategy(&id).unwrap()).unwrap();

    let imported = session(&dst, |j| {
        j.create_strategy("Local", None, at(8)).unwrap();
        let strategy = import_strategy_json(&json).unwrap();
        j.import_strategy(strategy, at(12))
    });

    let journal = dst.load().unwrap();
    assert_eq!(journal.strategies.len(), 2);
    let shared = journal.strategy(&imported).unwrap();
    assert_eq!(shared.name, "Shared");
    assert!((shared.net_pl() + 250.0).abs() < 1e-6);
}

#[test]
fn legacy_file_without_schema_version_loads() {
    let dir = TempDir::new().unwrap();
    let store = JournalStore::new(dir.path());
    std::fs::write(
        store.path(),
        r#"{
          "strategies": {
            "1700000000000": {
              "id": "1700000000000",
              "name": "Old",
              "startingBalance": 10000,
              "createdAt": "2023-11-14T22:13:20Z",
              "trades": [{
                "id": "1700000000001",
                "date": "2023-11-14",
                "symbol": "XAUUSD",
                "type": "SELL",
                "quantity": 0.1,
                "entryPrice": 1960.0,
                "exitPrice": 1950.0,
                "profitLoss": 100.0,
                "createdAt": "2023-11-14T22:13:20Z"
              }]
            }
          }
        }"#,
    )
    .unwrap();

    let journal = store.load().unwrap();
    assert_eq!(journal.schema_version, tradejournal_store::SCHEMA_VERSION);
    let strategy = journal.current().unwrap();
    assert_eq!(strategy.name, "Old");
    assert_eq!(strategy.trades[0].lot_size, 0.1);
    assert_eq!(strategy.trades[0].direction, Direction::Sell);
}

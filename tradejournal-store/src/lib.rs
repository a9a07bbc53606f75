//! Trade Journal Store: persistence and the ambient stack around the core.
//!
//! This crate builds on `tradejournal-core` to provide:
//! - The journal book (strategies plus current selection)
//! - JSON file persistence with schema versioning
//! - TOML configuration and tracing setup
//! - CSV and JSON export

pub mod config;
pub mod export;
pub mod journal;
pub mod logging;
pub mod store;

pub use config::{ConfigError, JournalConfig};
pub use export::{export_strategy_json, export_trades_csv, import_strategy_json};
pub use journal::{Journal, JournalError};
pub use logging::LoggingConfig;
pub use store::{JournalStore, StoreError, JOURNAL_FILE, SCHEMA_VERSION};

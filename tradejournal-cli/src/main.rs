//! Trade Journal CLI: calculator, strategies, trades, dashboard and export.
//!
//! Commands:
//! - `calc pl|pip|format`: the price calculator on its own
//! - `pair info|list`: instrument details and the pair catalog
//! - `strategy create|list|switch|delete|import`: manage strategies
//! - `trade add|edit|delete|no-trade|list`: journal entries in the current strategy
//! - `stats`: dashboard figures for the current strategy
//! - `calendar`: monthly P/L grid
//! - `export csv|json`: trade tape or the whole strategy

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use tradejournal_core::calendar::{MonthCalendar, YearMonth, WEEKDAY_HEADERS};
use tradejournal_core::catalog::{self, CatalogEntry, PairCategory};
use tradejournal_core::domain::{Direction, StrategyId, TradeDraft, TradeEntry, TradeId};
use tradejournal_core::pricing::{
    compute_pip_value, compute_pl, describe, format_price, is_open_exit,
};
use tradejournal_core::query::{DirectionFilter, SortOrder, TradeQuery};
use tradejournal_core::stats::{DashboardStats, DateRange, JournalSummary, StreakKind};
use tradejournal_store::{
    export_strategy_json, export_trades_csv, import_strategy_json, Journal, JournalConfig,
    JournalStore,
};

#[derive(Parser)]
#[command(
    name = "tradejournal",
    version,
    about = "Trade Journal: forex/CFD trade log with P/L calculator"
)]
struct Cli {
    /// Config file (TOML). Defaults to <config dir>/tradejournal/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding journal.json. Overrides the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price calculator.
    Calc {
        #[command(subcommand)]
        action: CalcAction,
    },
    /// Instrument details and the selectable pair list.
    Pair {
        #[command(subcommand)]
        action: PairAction,
    },
    /// Manage strategies.
    Strategy {
        #[command(subcommand)]
        action: StrategyAction,
    },
    /// Log and review trades in the current strategy.
    Trade {
        #[command(subcommand)]
        action: TradeAction,
    },
    /// Dashboard statistics for the current strategy.
    Stats {
        /// all, today, week, month or year.
        #[arg(long, default_value = "all")]
        range: DateRange,

        /// Month for the monthly block (YYYY-MM). Defaults to this month.
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Monthly P/L calendar for the current strategy.
    Calendar {
        /// Month to show (YYYY-MM). Defaults to this month.
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Export the current strategy.
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },
}

#[derive(Subcommand)]
enum CalcAction {
    /// Profit/loss in USD. Omit --exit (or pass 0) for an open trade.
    Pl {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        lot: f64,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        exit: Option<f64>,
        /// BUY/LONG or SELL/SHORT.
        #[arg(long, default_value = "BUY")]
        direction: Direction,
    },
    /// USD value of a one-pip move.
    Pip {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        lot: f64,
    },
    /// Render a price with the instrument's precision.
    Format {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        price: f64,
    },
}

#[derive(Subcommand)]
enum PairAction {
    /// Contract size, pip position and type of a symbol.
    Info { symbol: String },
    /// List the pair catalog.
    List {
        /// Substring of the symbol or description.
        #[arg(long)]
        search: Option<String>,
        /// major, cross, metal, index or crypto.
        #[arg(long)]
        category: Option<PairCategory>,
    },
}

#[derive(Subcommand)]
enum StrategyAction {
    /// Create a strategy and make it current.
    Create {
        name: String,
        /// Starting balance. Defaults to the configured default.
        #[arg(long)]
        balance: Option<f64>,
    },
    /// List strategies; the current one is marked with '*'.
    List,
    /// Make another strategy current.
    Switch { id: String },
    /// Delete a strategy and all its trades.
    Delete {
        id: String,
        /// Actually delete (without this flag, only previews what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Import a strategy exported with `export json`.
    Import { path: PathBuf },
}

#[derive(Args)]
struct TradeFields {
    /// Trade date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    symbol: Option<String>,
    /// BUY/LONG or SELL/SHORT.
    #[arg(long)]
    direction: Option<Direction>,
    #[arg(long)]
    lot: Option<String>,
    #[arg(long)]
    entry: Option<String>,
    /// Exit price; leave empty while the trade is open.
    #[arg(long)]
    exit: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Planned risk/reward, e.g. 1:2.
    #[arg(long)]
    rr: Option<String>,
    /// Screenshot path or URL.
    #[arg(long)]
    screenshot: Option<String>,
}

#[derive(Subcommand)]
enum TradeAction {
    /// Log a trade.
    Add {
        #[command(flatten)]
        fields: TradeFields,
    },
    /// Change fields of a trade; P/L is recomputed.
    Edit {
        id: String,
        #[command(flatten)]
        fields: TradeFields,
    },
    /// Delete a trade.
    Delete {
        id: String,
        /// Actually delete (without this flag, only previews what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Mark a day on which no trade was taken.
    NoTrade {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List trades.
    List {
        /// all, buy or sell.
        #[arg(long, default_value = "all")]
        direction: DirectionFilter,
        /// Substring of the symbol or notes.
        #[arg(long, default_value = "")]
        search: String,
        /// date-desc, date-asc, pl-desc or pl-asc.
        #[arg(long, default_value = "date-desc")]
        sort: SortOrder,
    },
}

#[derive(Subcommand)]
enum ExportFormat {
    /// Trade tape as CSV.
    Csv {
        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Strategy with all trades as JSON.
    Json {
        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Resolved runtime context shared by the journal commands.
struct App {
    config: JournalConfig,
    store: JournalStore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_config = dirs::config_dir().map(|d| d.join("tradejournal").join("config.toml"));
    let config = JournalConfig::load(cli.config.as_deref(), default_config.as_deref())
        .context("failed to load configuration")?;
    config.logging.init();

    let data_dir = resolve_data_dir(cli.data_dir, &config);
    debug!(data_dir = %data_dir.display(), "resolved data directory");
    let ctx = App {
        store: JournalStore::new(&data_dir),
        config,
    };

    match cli.command {
        Commands::Calc { action } => run_calc(action),
        Commands::Pair { action } => run_pair(action),
        Commands::Strategy { action } => run_strategy(&ctx, action),
        Commands::Trade { action } => run_trade(&ctx, action),
        Commands::Stats { range, month } => run_stats(&ctx, range, month),
        Commands::Calendar { month } => run_calendar(&ctx, month),
        Commands::Export { format } => run_export(&ctx, format),
    }
}

/// `--data-dir`, then the config file, then the platform data dir, then `./data`.
fn resolve_data_dir(flag: Option<PathBuf>, config: &JournalConfig) -> PathBuf {
    flag.or_else(|| config.data_dir.clone())
        .or_else(|| dirs::data_dir().map(|d| d.join("tradejournal")))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ─── calc / pair ────────────────────────────────────────────────────

fn run_calc(action: CalcAction) -> Result<()> {
    match action {
        CalcAction::Pl {
            symbol,
            lot,
            entry,
            exit,
            direction,
        } => {
            let pl = compute_pl(&symbol, lot, entry, exit, direction);
            if is_open_exit(exit) {
                println!("{} (open trade)", format_money(pl));
            } else {
                println!("{}", format_money(pl));
            }
        }
        CalcAction::Pip { symbol, lot } => {
            println!("${:.2} per pip", compute_pip_value(&symbol, lot));
        }
        CalcAction::Format { symbol, price } => {
            println!("{}", format_price(&symbol, price));
        }
    }
    Ok(())
}

fn run_pair(action: PairAction) -> Result<()> {
    match action {
        PairAction::Info { symbol } => {
            let info = describe(&symbol);
            println!("Symbol:         {}", info.name);
            println!("Type:           {}", info.kind_label);
            println!("Contract size:  {}", info.contract_size);
            println!("Pip position:   {}", info.pip_position);
        }
        PairAction::List { search, category } => {
            let entries = list_pairs(search.as_deref(), category);
            if entries.is_empty() {
                println!("No pairs match.");
                return Ok(());
            }
            println!("{:<8} {:<7} {}", "Symbol", "Type", "Description");
            println!("{}", "-".repeat(60));
            for e in entries {
                println!("{:<8} {:<7} {}", e.symbol, e.category, e.label);
            }
        }
    }
    Ok(())
}

fn list_pairs(search: Option<&str>, category: Option<PairCategory>) -> Vec<&'static CatalogEntry> {
    let query = search.unwrap_or("");
    match category {
        Some(category) => {
            let matching = catalog::search(query);
            catalog::by_category(category)
                .into_iter()
                .filter(|e| matching.iter().any(|m| m.symbol == e.symbol))
                .collect()
        }
        None => catalog::search(query),
    }
}

// ─── strategy ───────────────────────────────────────────────────────

fn run_strategy(ctx: &App, action: StrategyAction) -> Result<()> {
    let mut journal = ctx.store.load()?;

    match action {
        StrategyAction::Create { name, balance } => {
            let balance = balance.unwrap_or(ctx.config.default_starting_balance);
            let id = journal.create_strategy(&name, Some(balance), Utc::now())?;
            ctx.store.save(&journal)?;
            let strategy = journal.strategy(&id).context("created strategy vanished")?;
            println!(
                "Created strategy '{}' ({id}) with balance {}",
                strategy.name,
                format_money(strategy.starting_balance)
            );
        }
        StrategyAction::List => {
            if journal.is_empty() {
                println!("No strategies yet. Create one with `strategy create <NAME>`.");
                return Ok(());
            }
            println!(
                "  {:<15} {:<24} {:>7} {:>14} {:>14}",
                "ID", "Name", "Trades", "Start", "Balance"
            );
            println!("{}", "-".repeat(79));
            for (id, s) in &journal.strategies {
                let marker = if journal.current_strategy.as_ref() == Some(id) { '*' } else { ' ' };
                println!(
                    "{marker} {:<15} {:<24} {:>7} {:>14} {:>14}",
                    id.as_str(),
                    truncate(&s.name, 24),
                    s.actual_trades().count(),
                    format_money(s.starting_balance),
                    format_money(s.current_balance())
                );
            }
        }
        StrategyAction::Switch { id } => {
            let id = StrategyId::new(id);
            journal.switch_strategy(&id)?;
            ctx.store.save(&journal)?;
            let name = journal.current().map(|s| s.name.as_str()).unwrap_or_default();
            println!("Switched to '{name}' ({id})");
        }
        StrategyAction::Delete { id, confirm } => {
            let id = StrategyId::new(id);
            let Some(strategy) = journal.strategy(&id) else {
                bail!("strategy {id} not found");
            };
            println!(
                "Strategy '{}' ({id}) with {} entr{} will be deleted.",
                strategy.name,
                strategy.trades.len(),
                if strategy.trades.len() == 1 { "y" } else { "ies" }
            );
            if !confirm {
                println!();
                println!("Dry run: pass --confirm to actually delete.");
                return Ok(());
            }
            journal.delete_strategy(&id)?;
            ctx.store.save(&journal)?;
            match journal.current() {
                Some(current) => println!("Deleted. Current strategy: '{}'", current.name),
                None => println!("Deleted. No strategies left."),
            }
        }
        StrategyAction::Import { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let strategy = import_strategy_json(&json)?;
            let name = strategy.name.clone();
            let id = journal.import_strategy(strategy, Utc::now());
            ctx.store.save(&journal)?;
            println!("Imported strategy '{name}' as {id}");
        }
    }
    Ok(())
}

// ─── trade ──────────────────────────────────────────────────────────

fn run_trade(ctx: &App, action: TradeAction) -> Result<()> {
    let mut journal = ctx.store.load()?;

    match action {
        TradeAction::Add { fields } => {
            let draft = new_draft(fields)?;
            let id = journal.add_trade(draft, Utc::now())?;
            ctx.store.save(&journal)?;
            let trade = current_trade(&journal, &id)?;
            println!("Logged {} ({id}): {}", trade.display_name(), format_money(trade.profit_loss));
        }
        TradeAction::Edit { id, fields } => {
            let id = TradeId::new(id);
            let existing = current_trade(&journal, &id)?;
            let draft = apply_fields(TradeDraft::from_entry(existing), fields);
            let trade = journal.edit_trade(&id, draft)?;
            println!("Updated {} ({id}): {}", trade.display_name(), format_money(trade.profit_loss));
            ctx.store.save(&journal)?;
        }
        TradeAction::Delete { id, confirm } => {
            let id = TradeId::new(id);
            let trade = current_trade(&journal, &id)?;
            println!("Trade {} on {} ({id}) will be deleted.", trade.display_name(), trade.date);
            if !confirm {
                println!();
                println!("Dry run: pass --confirm to actually delete.");
                return Ok(());
            }
            journal.delete_trade(&id)?;
            ctx.store.save(&journal)?;
            println!("Deleted.");
        }
        TradeAction::NoTrade { date, notes } => {
            let date = date.unwrap_or_else(today);
            let id = journal.add_trade(TradeDraft::no_trade(date, notes), Utc::now())?;
            ctx.store.save(&journal)?;
            println!("Marked {date} as a no-trade day ({id})");
        }
        TradeAction::List {
            direction,
            search,
            sort,
        } => {
            let strategy = journal.current().context("no strategy selected; create one first")?;
            let query = TradeQuery { direction, search, sort };
            let trades = query.apply(&strategy.trades);
            for line in summary_lines(&JournalSummary::compute(&strategy.trades)) {
                println!("{line}");
            }
            println!();
            print_trades(&strategy.name, &trades);
        }
    }
    Ok(())
}

fn current_trade<'a>(journal: &'a Journal, id: &TradeId) -> Result<&'a TradeEntry> {
    let strategy = journal.current().context("no strategy selected; create one first")?;
    strategy
        .trade(id)
        .with_context(|| format!("trade {id} not found in '{}'", strategy.name))
}

fn new_draft(fields: TradeFields) -> Result<TradeDraft> {
    if fields.symbol.is_none() || fields.lot.is_none() || fields.entry.is_none() {
        bail!("--symbol, --lot and --entry are required to log a trade");
    }
    let base = TradeDraft {
        date: today(),
        ..TradeDraft::default()
    };
    Ok(apply_fields(base, fields))
}

fn apply_fields(mut draft: TradeDraft, fields: TradeFields) -> TradeDraft {
    if let Some(date) = fields.date {
        draft.date = date;
    }
    if let Some(symbol) = fields.symbol {
        draft.symbol = symbol;
    }
    if let Some(direction) = fields.direction {
        draft.direction = direction;
    }
    if let Some(lot) = fields.lot {
        draft.lot_size = lot;
    }
    if let Some(entry) = fields.entry {
        draft.entry_price = entry;
    }
    if let Some(exit) = fields.exit {
        draft.exit_price = exit;
    }
    if let Some(notes) = fields.notes {
        draft.notes = notes;
    }
    if let Some(rr) = fields.rr {
        draft.risk_reward_ratio = rr;
    }
    if fields.screenshot.is_some() {
        draft.screenshot = fields.screenshot;
    }
    draft
}

/// Totals over the whole strategy, independent of list filters.
fn summary_lines(summary: &JournalSummary) -> [String; 3] {
    [
        format!(
            "Trades: {}  (won {}, lost {})  Win rate: {:.1}%",
            summary.total_trades, summary.winning_trades, summary.losing_trades, summary.win_rate
        ),
        format!(
            "Profit: {}  Loss: {}",
            format_money(summary.total_profit),
            format_money(-summary.total_loss)
        ),
        format!("Net P/L: {}", format_money(summary.net_pl)),
    ]
}

fn print_trades(strategy: &str, trades: &[&TradeEntry]) {
    println!("=== {strategy} ===");
    if trades.is_empty() {
        println!("No trades match.");
        return;
    }
    println!(
        "{:<15} {:<10} {:<8} {:<4} {:>6} {:>11} {:>11} {:>12}  {}",
        "ID", "Date", "Symbol", "Side", "Lots", "Entry", "Exit", "P/L", "Notes"
    );
    println!("{}", "-".repeat(100));
    for t in trades {
        if !t.is_actual() {
            println!(
                "{:<15} {:<10} {:<8} {:<4} {:>6} {:>11} {:>11} {:>12}  {}",
                t.id.as_str(),
                t.date,
                "-",
                "",
                "",
                "",
                "",
                "no trade",
                t.notes
            );
            continue;
        }
        let exit = if t.is_open() {
            "open".to_string()
        } else {
            format_price(&t.symbol, t.exit_price)
        };
        println!(
            "{:<15} {:<10} {:<8} {:<4} {:>6} {:>11} {:>11} {:>12}  {}",
            t.id.as_str(),
            t.date,
            t.symbol,
            t.direction,
            t.lot_size,
            format_price(&t.symbol, t.entry_price),
            exit,
            format_money(t.profit_loss),
            truncate(&t.notes, 30)
        );
    }
}

// ─── stats / calendar ───────────────────────────────────────────────

fn run_stats(ctx: &App, range: DateRange, month: Option<YearMonth>) -> Result<()> {
    let journal = ctx.store.load()?;
    let strategy = journal.current().context("no strategy selected; create one first")?;
    let today = today();
    let month = month.unwrap_or_else(|| YearMonth::of(today));
    let stats = DashboardStats::compute(
        &strategy.trades,
        strategy.starting_balance,
        range,
        month,
        today,
    );

    let streak = match stats.current_streak.kind {
        StreakKind::Win => format!("{} win(s)", stats.current_streak.count),
        StreakKind::Loss => format!("{} loss(es)", stats.current_streak.count),
        StreakKind::None => "-".to_string(),
    };

    println!();
    println!("=== {} ({range:?}) ===", strategy.name);
    println!("Starting Balance: {}", format_money(stats.starting_balance));
    println!("Current Balance:  {}", format_money(stats.current_balance));
    println!();
    println!("--- Performance ---");
    println!("Net P/L:          {}", format_money(stats.net_pl));
    println!("Trades:           {}", stats.total_trades);
    println!(
        "Wins / Losses:    {} / {}",
        stats.winning_trades, stats.losing_trades
    );
    println!("Win Rate:         {:.1}%", stats.trade_win_rate);
    println!("Profit Factor:    {:.2}", stats.profit_factor);
    println!("Expectancy:       {}", format_money(stats.trade_expectancy));
    println!("Current Streak:   {streak}");
    println!("Max Consec Win:   {}", stats.max_consecutive_wins);
    println!("Max Consec Loss:  {}", stats.max_consecutive_losses);
    println!();
    println!("--- {month} ---");
    println!("Profit:           {}", format_money(stats.monthly.profit));
    println!("Trading Days:     {}", stats.monthly.days);
    println!();
    Ok(())
}

fn run_calendar(ctx: &App, month: Option<YearMonth>) -> Result<()> {
    let journal = ctx.store.load()?;
    let strategy = journal.current().context("no strategy selected; create one first")?;
    let today = today();
    let month = month.unwrap_or_else(|| YearMonth::of(today));
    let cal = MonthCalendar::build(month, &strategy.trades);

    println!("{:^84}", month.first_day().format("%B %Y").to_string());
    let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|d| format!("{d:^12}")).collect();
    println!("{}", header.join(""));
    for week in cal.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => " ".repeat(12),
                Some(c) => {
                    let mark = if c.is_today(today) { '*' } else { ' ' };
                    if c.has_trades() {
                        format!("{:>2}{mark}{:>9}", c.day, format!("{:+.0}", c.pl))
                    } else {
                        format!("{:>2}{mark}{:>9}", c.day, "")
                    }
                }
            })
            .collect();
        println!("{}", row.join(""));
    }
    println!();
    println!("Month P/L: {}", format_money(cal.month_pl()));
    Ok(())
}

// ─── export ─────────────────────────────────────────────────────────

fn run_export(ctx: &App, format: ExportFormat) -> Result<()> {
    let journal = ctx.store.load()?;
    let strategy = journal.current().context("no strategy selected; create one first")?;

    let (content, output) = match format {
        ExportFormat::Csv { output } => (export_trades_csv(&strategy.trades)?, output),
        ExportFormat::Json { output } => (export_strategy_json(strategy)?, output),
    };

    match output {
        Some(path) => {
            write_output(&path, &content)?;
            eprintln!("Exported '{}' to {}", strategy.name, path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

// ─── formatting ─────────────────────────────────────────────────────

/// `+$1,234.50` / `-$12.00`.
fn format_money(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+inf" } else { "-inf" }.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "+" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

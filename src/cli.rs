//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config::{AppConfig, FetcherConfig, FetcherKind};
use crate::domain::error::ScreenerError;
use crate::domain::screening::{ScreeningEngine, ScreeningRun, SkipReason};
use crate::domain::stock_pool::StockPool;
use crate::domain::strategy::factory;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// HTTP and TLS crates that are pinned to `warn` unless `RUST_LOG` says otherwise.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

#[derive(Parser, Debug)]
#[command(name = "screener", about = "Daily stock screener", version)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the configured universe and record passing symbols
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Only screen the first N symbols
        #[arg(short, long)]
        limit: Option<usize>,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Validate a configuration file without fetching any data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List or clear the stock pool
    Pool {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        clear: bool,
    },
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = String::from(if verbose { "debug" } else { "info" });
        for module in NOISY_MODULES {
            directives.push_str(&format!(",{module}=warn"));
        }
        EnvFilter::new(directives)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let ScreenerError::UnknownStrategyType(_) = e {
                let known: Vec<_> = factory::known_types().collect();
                eprintln!("  known strategy types: {}", known.join(", "));
            }
            (&e).into()
        }
    }
}

/// Run `command`, writing its user-facing output to `out`.
pub fn execute(command: Command, out: &mut dyn Write) -> Result<(), ScreenerError> {
    match command {
        Command::Screen { config, limit, today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            run_screen(&config, limit, today, out).map(|_| ())
        }
        Command::Validate { config } => run_validate(&config, out),
        Command::Pool { config, clear } => run_pool(&config, clear, out),
    }
}

/// Load and validate the configuration, returning it with the directory that
/// relative paths inside it resolve against.
pub fn load_app_config(path: &Path) -> Result<(AppConfig, PathBuf), ScreenerError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    let config = AppConfig::from_config(&adapter)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base))
}

pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub fn build_data_port(fetcher: &FetcherConfig, base: &Path) -> Result<Box<dyn DataPort>, ScreenerError> {
    match fetcher.kind {
        FetcherKind::Csv => Ok(Box::new(CsvAdapter::new(resolve_path(base, &fetcher.csv_dir)))),
        #[cfg(feature = "yahoo")]
        FetcherKind::Yahoo => {
            use crate::adapters::yahoo_adapter::YahooAdapter;
            let pause = std::time::Duration::from_millis(fetcher.pause_ms);
            Ok(Box::new(YahooAdapter::new(pause)?))
        }
        #[cfg(not(feature = "yahoo"))]
        FetcherKind::Yahoo => Err(ScreenerError::ConfigInvalid {
            section: "data".into(),
            key: "fetcher".into(),
            reason: "the yahoo fetcher requires the `yahoo` feature".into(),
        }),
    }
}

/// The `screen` command: screen every universe symbol over the lookback
/// window ending `today`, persist passes to the stock pool and print the
/// report to `out`.
pub fn run_screen(
    config_path: &Path,
    limit: Option<usize>,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<ScreeningRun, ScreenerError> {
    info!(config = %config_path.display(), "loading config");
    let (config, base) = load_app_config(config_path)?;

    let strategies = factory::create_all(&config.strategies)?;
    if strategies.is_empty() {
        warn!("no enabled strategies configured");
    }

    let pool = StockPool::open(resolve_path(&base, &config.stock_pool.path))?;
    let data_port = build_data_port(&config.fetcher, &base)?;

    let mut symbols = config.all_symbols(&base)?;
    if let Some(limit) = limit {
        symbols.truncate(limit);
    }

    let (start, end) = config.fetcher.period(today)?;
    let mut engine = ScreeningEngine::new(data_port.as_ref(), strategies, pool);
    let run = engine.run(&symbols, start, end)?;

    for skipped in &run.skipped {
        match &skipped.reason {
            SkipReason::FetchFailed(reason) => warn!(symbol = %skipped.symbol, %reason, "skipped"),
            SkipReason::NoData => warn!(symbol = %skipped.symbol, "skipped: no data in window"),
        }
    }

    TextReportAdapter::new().write(&run.candidates, out)?;
    Ok(run)
}

fn run_validate(config_path: &Path, out: &mut dyn Write) -> Result<(), ScreenerError> {
    let (config, base) = load_app_config(config_path)?;
    let strategies = factory::create_all(&config.strategies)?;
    let symbols = config.all_symbols(&base)?;

    writeln!(
        out,
        "Configuration OK: {} strategies, {} symbols",
        strategies.len(),
        symbols.len()
    )?;
    for strategy in &strategies {
        writeln!(
            out,
            "  - {} ({}, needs {} bars)",
            strategy.name(),
            strategy.type_name(),
            strategy.min_bars()
        )?;
    }
    Ok(())
}

fn run_pool(config_path: &Path, clear: bool, out: &mut dyn Write) -> Result<(), ScreenerError> {
    let (config, base) = load_app_config(config_path)?;
    let mut pool = StockPool::open(resolve_path(&base, &config.stock_pool.path))?;

    if clear {
        let removed = pool.len();
        pool.clear()?;
        writeln!(out, "Cleared {} entries from {}", removed, pool.path().display())?;
        return Ok(());
    }

    if pool.is_empty() {
        writeln!(out, "Stock pool is empty")?;
        return Ok(());
    }

    for entry in pool.entries() {
        writeln!(
            out,
            "{}  {:<10} {:<24} score={:.4}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.symbol,
            entry.strategy,
            entry.score
        )?;
    }
    Ok(())
}

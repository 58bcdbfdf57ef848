//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_result_adapter::{read_trade_logs, CsvResultAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BatchReport};
use crate::domain::config_validation::{parse_date, telegram_enabled, validate_all};
use crate::domain::error::SigtraderError;
use crate::domain::frame::IndicatorParams;
use crate::domain::metrics::{InstrumentSummary, Summary};
use crate::domain::signal::{EntryRule, DEFAULT_RSI_ENTRY_THRESHOLD};
use crate::domain::simulator::{SimulatorConfig, DEFAULT_HOLD_DAYS};
use crate::domain::universe::parse_instruments;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::{Notifier, NullNotifier};
use crate::ports::report_port::ResultSink;

pub const DEFAULT_RESULTS_DIR: &str = "backtest_results";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "RSI/moving-average signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over the configured instruments
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Results directory (overrides [output] results_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Backtest a single instrument instead of the configured list
        #[arg(long)]
        instrument: Option<String>,
        /// Skip the Telegram summary
        #[arg(long)]
        no_notify: bool,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Summarize trade logs from a results directory
    Summarize {
        #[arg(short, long)]
        results: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            instrument,
            no_notify,
        } => run_backtest(&config, output.as_deref(), instrument.as_deref(), no_notify),
        Command::Validate { config } => run_validate(&config),
        Command::Summarize { results } => run_summarize(&results),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SigtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_and_validate(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(adapter)
}

pub fn run_backtest(
    config_path: &Path,
    output_override: Option<&Path>,
    instrument_override: Option<&str>,
    no_notify: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_and_validate(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build BacktestConfig
    let today = Local::now().date_naive();
    let mut bt_config = match build_backtest_config(&adapter, today) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    match resolve_instruments(instrument_override, &bt_config.instruments) {
        Ok(instruments) => bt_config.instruments = instruments,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    // Stage 3: Wire adapters
    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let notifier: Box<dyn Notifier> = if no_notify {
        Box::new(NullNotifier)
    } else {
        match build_notifier(&adapter) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    };
    let results_dir = resolve_results_dir(output_override, &adapter);
    let sink = CsvResultAdapter::new(results_dir.clone());

    // Stages 4-7: Fetch, backtest, persist, notify
    let written_at = Local::now().naive_local();
    let exit_code = run_backtest_pipeline(
        data_port.as_ref(),
        &bt_config,
        &sink,
        notifier.as_ref(),
        written_at,
    );
    eprintln!("\nResults written to: {}", results_dir.display());
    exit_code
}

/// Reads backtest settings from `[backtest]` and `[strategy]`. `today` is the
/// end date when none is configured.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<BacktestConfig, SigtraderError> {
    let instruments_str = adapter
        .get_string("backtest", "instruments")
        .ok_or_else(|| SigtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "instruments".into(),
        })?;
    let instruments =
        parse_instruments(&instruments_str).map_err(|e| SigtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "instruments".into(),
            reason: e.to_string(),
        })?;

    let end_date = match adapter.get_string("backtest", "end_date") {
        Some(s) => parse_date(&s, "backtest", "end_date")?,
        None => today,
    };

    let defaults = IndicatorParams::default();
    let window = |key: &str, default: usize| -> usize {
        let value = adapter.get_int("strategy", key, default as i64);
        usize::try_from(value).unwrap_or(default)
    };

    Ok(BacktestConfig {
        instruments,
        end_date,
        lookback_days: adapter.get_int(
            "backtest",
            "lookback_days",
            backtest_engine::DEFAULT_LOOKBACK_DAYS,
        ),
        indicators: IndicatorParams {
            rsi_period: window("rsi_period", defaults.rsi_period),
            dma_fast: window("dma_fast", defaults.dma_fast),
            dma_slow: window("dma_slow", defaults.dma_slow),
            macd_fast: window("macd_fast", defaults.macd_fast),
            macd_slow: window("macd_slow", defaults.macd_slow),
            macd_signal: window("macd_signal", defaults.macd_signal),
            volatility_window: window("volatility_window", defaults.volatility_window),
            roc_period: window("roc_period", defaults.roc_period),
        },
        entry: EntryRule {
            rsi_threshold: adapter.get_double(
                "strategy",
                "rsi_entry_threshold",
                DEFAULT_RSI_ENTRY_THRESHOLD,
            ),
        },
        simulator: SimulatorConfig {
            hold_days: adapter.get_int("strategy", "hold_days", DEFAULT_HOLD_DAYS),
        },
    })
}

/// A single `--instrument` replaces the configured list.
pub fn resolve_instruments(
    instrument_override: Option<&str>,
    configured: &[String],
) -> Result<Vec<String>, SigtraderError> {
    match instrument_override {
        Some(symbol) => parse_instruments(symbol).map_err(|e| SigtraderError::ConfigInvalid {
            section: "cli".into(),
            key: "instrument".into(),
            reason: e.to_string(),
        }),
        None => Ok(configured.to_vec()),
    }
}

pub fn resolve_results_dir(output_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("output", "results_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR))
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, SigtraderError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "yahoo".to_string())
        .trim()
        .to_lowercase();

    match source.as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .ok_or_else(|| SigtraderError::ConfigMissing {
                    section: "data".into(),
                    key: "csv_dir".into(),
                })?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => {
            let adapter = crate::adapters::yahoo_adapter::YahooAdapter::new()?;
            Ok(Box::new(adapter))
        }
        #[cfg(not(feature = "yahoo"))]
        "yahoo" => Err(SigtraderError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "yahoo feature is required for this source".into(),
        }),
        other => Err(SigtraderError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown source '{other}'"),
        }),
    }
}

/// A `[telegram]` section enables the Telegram notifier unless it sets
/// `enabled = false`; otherwise summaries are not sent anywhere.
pub fn build_notifier(config: &dyn ConfigPort) -> Result<Box<dyn Notifier>, SigtraderError> {
    if !telegram_enabled(config) {
        return Ok(Box::new(NullNotifier));
    }

    #[cfg(feature = "telegram")]
    {
        let get = |key: &str| {
            config
                .get_string("telegram", key)
                .ok_or_else(|| SigtraderError::ConfigMissing {
                    section: "telegram".into(),
                    key: key.into(),
                })
        };
        let notifier = crate::adapters::telegram_adapter::TelegramNotifier::new(
            &get("token")?,
            &get("chat_id")?,
        )?;
        Ok(Box::new(notifier))
    }

    #[cfg(not(feature = "telegram"))]
    {
        log::warn!("[telegram] configured but the telegram feature is disabled");
        Ok(Box::new(NullNotifier))
    }
}

/// Runs the batch, persists results, sends the summary and prints it.
///
/// Sink and notifier failures are logged and do not change the exit code.
/// When no instrument produced a trade log the first instrument error decides
/// the exit code.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    sink: &dyn ResultSink,
    notifier: &dyn Notifier,
    written_at: NaiveDateTime,
) -> ExitCode {
    eprintln!(
        "Running backtest: {} instruments, {} to {}",
        bt_config.instruments.len(),
        bt_config.start_date(),
        bt_config.end_date,
    );

    let report = backtest_engine::run_batch(data_port, bt_config);
    let summary = report.summary();

    if let Err(e) = sink.write_batch(&report, written_at) {
        error!("failed to write results: {e}");
    }
    if let Err(e) = notifier.notify(&summary, written_at) {
        error!("failed to send summary: {e}");
    }

    print_batch(&report);
    print_aggregate(&summary);

    if report.has_results() {
        return ExitCode::SUCCESS;
    }
    match report.instruments.iter().find_map(|i| i.outcome.as_ref().err()) {
        Some(e) => {
            eprintln!("error: no instrument produced results");
            e.into()
        }
        None => {
            eprintln!("error: no instruments configured");
            ExitCode::from(2)
        }
    }
}

fn print_instrument(s: &InstrumentSummary) {
    eprintln!(
        "  {}:  {} trades, {} wins, {:.2}% win ratio, P&L {:+.2}",
        s.symbol,
        s.summary.total_trades,
        s.summary.winning_trades,
        s.summary.win_ratio,
        s.summary.total_pnl,
    );
}

fn print_batch(report: &BatchReport) {
    eprintln!("\n=== Per-Instrument Summary ===");
    for instrument in &report.instruments {
        match &instrument.outcome {
            Ok(log) => print_instrument(&InstrumentSummary {
                symbol: log.symbol.clone(),
                summary: Summary::from_trades(&log.trades),
            }),
            Err(e) if e.is_skip() => eprintln!("  {}:  skipped ({e})", instrument.symbol),
            Err(e) => eprintln!("  {}:  rejected ({e})", instrument.symbol),
        }
    }
}

fn print_aggregate(summary: &Summary) {
    let s = summary.rounded();
    eprintln!("\n=== Aggregate Results ===");
    eprintln!("Total Trades:     {}", s.total_trades);
    eprintln!("Winning Trades:   {}", s.winning_trades);
    eprintln!("Win Ratio:        {:.2}%", s.win_ratio);
    eprintln!("Total P&L:        {:.2}", s.total_pnl);
}

pub fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_and_validate(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let bt_config = match build_backtest_config(&adapter, Local::now().date_naive()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Config validated successfully");
    eprintln!("  Instruments:      {}", bt_config.instruments.join(", "));
    eprintln!("  Date range:       {} to {}", bt_config.start_date(), bt_config.end_date);
    eprintln!("  RSI period:       {}", bt_config.indicators.rsi_period);
    eprintln!("  Entry threshold:  RSI < {}", bt_config.entry.rsi_threshold);
    eprintln!(
        "  Trend filter:     {}-day MA > {}-day MA",
        bt_config.indicators.dma_fast, bt_config.indicators.dma_slow
    );
    eprintln!("  Hold days:        {}", bt_config.simulator.hold_days);
    eprintln!("  Minimum bars:     {}", bt_config.indicators.min_bars());
    eprintln!(
        "  Results dir:      {}",
        resolve_results_dir(None, &adapter).display()
    );
    ExitCode::SUCCESS
}

pub fn run_summarize(results_dir: &Path) -> ExitCode {
    info!("reading trade logs from {}", results_dir.display());
    let logs = match read_trade_logs(results_dir) {
        Ok(logs) => logs,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Per-Instrument Summary ===");
    for s in InstrumentSummary::compute_per_instrument(&logs) {
        print_instrument(&s);
    }
    print_aggregate(&Summary::from_logs(&logs));
    ExitCode::SUCCESS
}

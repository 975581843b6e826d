//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::chart_svg::SvgChartReportAdapter;
use crate::adapters::fallback_source::FallbackSource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::markdown_report_adapter::{format_duration, MarkdownReportAdapter};
use crate::adapters::perf_json_adapter::PerfJsonReportAdapter;
use crate::domain::config_validation::{validate_settings_config, validate_source_config};
use crate::domain::error::TradePerfError;
use crate::domain::load_state::LoadState;
use crate::domain::metrics::compute_metrics;
use crate::domain::settings::{ReportFormat, Settings, DEFAULT_BASE_CAPITAL, DEFAULT_OUTPUT};
use crate::domain::trade::TradeSet;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradeperf", about = "Performance statistics for closed trades")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print performance metrics for the first trade source that loads
    Summary {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Trade file (grid CSV or perf.json); repeat to add fallbacks
        #[arg(short, long)]
        input: Vec<PathBuf>,
        #[arg(long)]
        base_capital: Option<f64>,
    },
    /// Write a markdown, perf.json or SVG report
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        input: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        format: Option<ReportFormat>,
        #[arg(long)]
        base_capital: Option<f64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub inputs: Vec<PathBuf>,
    pub base_capital: Option<f64>,
    pub output: Option<PathBuf>,
    pub format: Option<ReportFormat>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Summary {
            config,
            input,
            base_capital,
        } => {
            let overrides = Overrides {
                inputs: input,
                base_capital,
                ..Overrides::default()
            };
            run_summary(config.as_ref(), &overrides)
        }
        Command::Report {
            config,
            input,
            output,
            format,
            base_capital,
        } => {
            let overrides = Overrides {
                inputs: input,
                base_capital,
                output,
                format,
            };
            run_report(config.as_ref(), &overrides)
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradePerfError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, TradePerfError> {
    let format = match config.get_string("report", "format") {
        Some(raw) => raw
            .parse::<ReportFormat>()
            .map_err(|reason| TradePerfError::ConfigInvalid {
                section: "report".into(),
                key: "format".into(),
                reason,
            })?,
        None => ReportFormat::Markdown,
    };

    Ok(Settings {
        base_capital: config.get_double("metrics", "base_capital", DEFAULT_BASE_CAPITAL),
        source_paths: config
            .get_list("source", "paths")
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        output: config
            .get_string("report", "output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        format,
    })
}

pub fn apply_overrides(mut settings: Settings, overrides: &Overrides) -> Result<Settings, TradePerfError> {
    if !overrides.inputs.is_empty() {
        settings.source_paths = overrides.inputs.clone();
    }
    if let Some(capital) = overrides.base_capital {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(TradePerfError::ConfigInvalid {
                section: "metrics".into(),
                key: "base_capital".into(),
                reason: "base_capital must be positive".into(),
            });
        }
        settings.base_capital = capital;
    }
    if let Some(output) = &overrides.output {
        settings.output = output.clone();
    }
    if let Some(format) = overrides.format {
        settings.format = format;
    }
    Ok(settings)
}

/// Load config (if any), validate it, and merge command-line overrides.
pub fn resolve_settings(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
) -> Result<Settings, ExitCode> {
    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };

    let validated = validate_settings_config(&adapter).and_then(|()| {
        if overrides.inputs.is_empty() {
            validate_source_config(&adapter)
        } else {
            Ok(())
        }
    });
    if let Err(e) = validated {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    build_settings(&adapter)
        .and_then(|s| apply_overrides(s, overrides))
        .map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })
}

/// Read trades from the configured sources and compute a fresh report.
pub fn load_trades(settings: &Settings) -> Result<LoadState, TradePerfError> {
    let chain = FallbackSource::from_paths(&settings.source_paths);
    let (source, trades) = chain.fetch_first()?;

    let trade_set = match TradeSet::new(trades.clone()) {
        Ok(set) => set,
        Err(TradePerfError::OutOfOrder { index }) => {
            log::warn!("{source}: trades not in exit order at index {index}, sorting");
            TradeSet::sorted(trades)
        }
        Err(e) => return Err(e),
    };

    Ok(LoadState::load(source, trade_set, settings.base_capital))
}

pub fn report_adapter_for(format: ReportFormat) -> Box<dyn ReportPort> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReportAdapter::new()),
        ReportFormat::Json => Box::new(PerfJsonReportAdapter::new()),
        ReportFormat::Svg => Box::new(SvgChartReportAdapter::new()),
    }
}

pub fn print_summary(state: &LoadState) {
    let (Some(source), Some(report)) = (state.source(), state.report()) else {
        eprintln!("No trades loaded.");
        return;
    };

    eprintln!("\n=== Performance ({}) ===", source);
    eprintln!("Total P&L:        {:.2}", report.total_pnl);
    eprintln!("Total Trades:     {}", report.total_trades);
    eprintln!("Win Rate:         {:.1}%", report.win_rate);
    eprintln!("Profit Factor:    {:.2}", report.profit_factor);
    eprintln!("Win/Loss Ratio:   {:.2}", report.win_loss_ratio);
    eprintln!("Sharpe Ratio:     {:.2}", report.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.2}%", report.max_drawdown);
    eprintln!("Avg Holding:      {}", format_duration(report.avg_holding_secs));

    if report.by_instrument.len() > 1 {
        eprintln!("\n=== Per-Instrument Summary ===");
        for (instrument, stats) in &report.by_instrument {
            let pnl_sign = if stats.profit >= 0.0 { "+" } else { "" };
            eprintln!(
                "  {}:  {} trades, {:.1}% win rate, {}{:.2}",
                instrument,
                stats.count,
                stats.win_rate(),
                pnl_sign,
                stats.profit,
            );
        }
    }
}

fn run_summary(config_path: Option<&PathBuf>, overrides: &Overrides) -> ExitCode {
    let settings = match resolve_settings(config_path, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match load_trades(&settings) {
        Ok(state) => {
            print_summary(&state);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Write the report for `state`. An empty load still produces a report for
/// an empty trade set.
pub fn write_report(state: &LoadState, settings: &Settings) -> Result<PathBuf, TradePerfError> {
    let empty = TradeSet::empty();
    let trades = state.trades().unwrap_or(&empty);
    let report = match state.report() {
        Some(r) => r.clone(),
        None => compute_metrics(trades, settings.base_capital),
    };

    let output = settings.output.clone();
    let adapter = report_adapter_for(settings.format);
    adapter.write(&report, trades, &path_str(&output))?;
    Ok(output)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn run_report(config_path: Option<&PathBuf>, overrides: &Overrides) -> ExitCode {
    let settings = match resolve_settings(config_path, overrides) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let state = match load_trades(&settings) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    print_summary(&state);

    match write_report(&state, &settings) {
        Ok(path) => {
            eprintln!("\nReport ({}) written to: {}", settings.format, path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_settings_config(&adapter).and_then(|()| validate_source_config(&adapter)) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let settings = match build_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nBase capital: {:.2}", settings.base_capital);
    eprintln!("Sources (in fallback order):");
    for path in &settings.source_paths {
        let marker = if path.exists() { "" } else { "  (missing)" };
        eprintln!("  {}{}", path.display(), marker);
    }
    eprintln!("Report: {} -> {}", settings.format, settings.output.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

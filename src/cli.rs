//! Command-line interface components.

use crate::board::render_board;
use crate::config::RankingConfig;
use crate::error::RankingError;
use crate::extraction::{extract_events, extract_for_date};
use crate::models::{DateRange, parse_date};
use crate::notify::{ConsoleSink, OutboxSink};
use crate::pipeline::{Batch, RunOutcome, UpdatePipeline, batches_from_extraction};
use crate::source::{KnmiFileSource, ObservationSource, parse_manual_entries};
use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::*;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "frost-ranking")]
#[command(about = "Cumulative frost leaderboard of KNMI weather stations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML); defaults to the user config directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding ranking.txt and board_update.txt
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Write notifications as files into this directory instead of stdout
    #[arg(long, global = true, value_name = "DIR")]
    pub outbox: Option<PathBuf>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score stations from a KNMI daily data export
    Update(UpdateArgs),
    /// Enter scores by hand as name,value lines on stdin (end with Ctrl+D)
    Manual,
    /// Print the current board
    Board,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    /// Date to score (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, conflicts_with_all = ["from", "to"], required_unless_present = "from")]
    pub date: Option<String>,

    /// First date of a backfill range
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last date of a backfill range, shown as the visible update
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// KNMI export file (defaults to `knmi_export` from the configuration)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

impl Args {
    /// Log level selected by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frost_ranking={}", args.log_level())));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr);

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .init();
    }

    debug!("Logging initialized at level: {}", args.log_level());
}

/// Resolve configuration from file, environment and flags
pub fn load_configuration(args: &Args) -> Result<RankingConfig> {
    let default_path = RankingConfig::default_config_path().filter(|path| path.exists());
    let config_file = args.config.clone().or(default_path);

    match &config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = RankingConfig::load_layered(config_file.as_deref())
        .context("Failed to load configuration")?;

    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(outbox) = &args.outbox {
        config = config.with_outbox_dir(outbox);
    }

    config.validate()?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Process exit code for a failed run
///
/// Bad input (an unreadable or malformed export, a bad date, malformed
/// manual entries) exits with 2; failures reading or writing the ranking
/// state and everything else exit with 1.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    let input_error = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<RankingError>())
        .any(RankingError::is_input_error);
    if input_error { 2 } else { 1 }
}

/// Execute the selected command
pub fn run(args: Args) -> Result<()> {
    let config = load_configuration(&args)?;

    match &args.command {
        Command::Update(update) => run_update(&config, update),
        Command::Manual => run_manual(&config),
        Command::Board => run_board(&config),
    }
}

fn run_update(config: &RankingConfig, update: &UpdateArgs) -> Result<()> {
    let (range, single_date) = match (&update.date, &update.from, &update.to) {
        (Some(date), _, _) => {
            let date = parse_date(date)?;
            (DateRange::single(date), Some(date))
        }
        (None, Some(from), Some(to)) => (DateRange::new(parse_date(from)?, parse_date(to)?)?, None),
        _ => bail!("Provide either --date or --from and --to"),
    };

    let input = update
        .input
        .clone()
        .or_else(|| config.knmi_export.clone())
        .context("No KNMI export given; use --input or set knmi_export in the configuration")?;

    let source = KnmiFileSource::new(input);
    let readings = source.fetch(&range)?;
    let registry = config.registry();

    let extraction = match single_date {
        Some(date) => extract_for_date(&readings, date, &registry),
        None => extract_events(&readings, &registry),
    };
    for warning in &extraction.warnings {
        eprintln!(
            "{} {} on {} skipped ({:?})",
            "warning:".yellow(),
            warning.station,
            warning.date,
            warning.reason
        );
    }

    run_pipeline(config, batches_from_extraction(extraction))
}

fn run_manual(config: &RankingConfig) -> Result<()> {
    println!("Enter update as name,value");
    println!("End with Ctrl+D");

    let events = parse_manual_entries(io::stdin().lock())?;
    let label = chrono::Local::now().date_naive().to_string();
    run_pipeline(config, vec![Batch::new(label, events)])
}

fn run_pipeline(config: &RankingConfig, batches: Vec<Batch>) -> Result<()> {
    let store = config.store();
    let outcome = match &config.outbox_dir {
        Some(dir) => UpdatePipeline::new(&store, &config.subject_prefix)
            .with_sink(OutboxSink::new(dir))
            .run(batches)?,
        None => UpdatePipeline::new(&store, &config.subject_prefix)
            .with_sink(ConsoleSink)
            .run(batches)?,
    };

    match outcome {
        RunOutcome::NoUpdate => {
            println!("{}", "No update received".yellow());
        }
        RunOutcome::Updated(report) => {
            println!("{}", report.summary.to_string().green());
            if report.applied.len() > 1 {
                println!(
                    "Backfilled {} dates up to {}",
                    report.applied.len() - 1,
                    report.applied.last().map(String::as_str).unwrap_or_default()
                );
            }
            println!(
                "{} stations ranked, board written to {}",
                report.stations_ranked,
                store.board_path().display()
            );
            if report.notifications_failed > 0 {
                eprintln!(
                    "{} {} notifications could not be delivered",
                    "warning:".yellow(),
                    report.notifications_failed
                );
            }
        }
    }

    Ok(())
}

fn run_board(config: &RankingConfig) -> Result<()> {
    let store = config.store();
    match store.read_board()? {
        Some(board) => print!("{}", board),
        None => {
            // No board yet: render the persisted ranking without annotations
            let ranking = store.load()?;
            if ranking.is_empty() {
                println!("{}", "The ranking is empty".yellow());
            } else {
                print!("{}", render_board(&ranking));
            }
        }
    }
    Ok(())
}

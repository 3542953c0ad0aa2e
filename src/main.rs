//! Winlog Timeline CLI
//!
//! Parses Windows event-log exports and IIS failed request traces into a
//! normalized event model and aggregates them into renderable timeline
//! series.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use winlog_timeline::aggregator::AggregationMode;
use winlog_timeline::commands::{
    execute_timeline, execute_views, validate_args, TimelineArgs, ViewsArgs,
};

/// Winlog Timeline - normalized timelines from Windows host logs
#[derive(Parser, Debug)]
#[command(name = "winlog-timeline")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Aggregation mode selector
#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Fixed-width (60 s) time buckets per source
    Histogram,
    /// Threshold-filtered duration points per source
    Scatter,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build aggregated timeline series from log files
    Timeline {
        /// Exported event-log container(s)
        #[arg(long)]
        evtx: Vec<PathBuf>,

        /// Request-trace document(s)
        #[arg(long)]
        trace: Vec<PathBuf>,

        /// Aggregation mode
        #[arg(short, long, value_enum, default_value = "histogram")]
        mode: ModeArg,

        /// Minimum duration (ms) a point must reach in scatter mode
        #[arg(short, long, default_value = "0")]
        threshold: f64,

        /// Output path for the series JSON
        #[arg(short, long, default_value = "timeline.json")]
        output: PathBuf,
    },

    /// Inspect the categorized views of one request trace
    Views {
        /// Request-trace document
        #[arg(short, long)]
        file: PathBuf,

        /// Summary-transform version key (e.g. "2016")
        #[arg(long)]
        version: Option<String>,

        /// Optional JSON dump of the views
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Timeline {
            evtx,
            trace,
            mode,
            threshold,
            output,
        } => {
            let args = TimelineArgs {
                evtx,
                trace,
                mode: match mode {
                    ModeArg::Histogram => AggregationMode::Histogram,
                    ModeArg::Scatter => AggregationMode::Scatter { threshold },
                },
                output,
            };

            validate_args(&args)?;
            execute_timeline(args)?;
        }

        Commands::Views {
            file,
            version,
            output,
        } => {
            execute_views(ViewsArgs {
                file,
                version,
                output,
            })?;
        }
    }

    Ok(())
}

//! Timeline command: ingest logs, aggregate, write series JSON.

use crate::aggregator::{aggregate, AggregationMode};
use crate::output::write_series;
use crate::parser::job::spawn_event_log_job;
use crate::parser::request_trace::parse_request_trace;
use crate::store::TimelineStore;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Arguments for the timeline command
#[derive(Debug)]
pub struct TimelineArgs {
    /// Exported event-log containers to ingest
    pub evtx: Vec<PathBuf>,
    /// Request-trace documents to ingest
    pub trace: Vec<PathBuf>,
    pub mode: AggregationMode,
    pub output: PathBuf,
}

/// Validate timeline arguments before doing any work
pub fn validate_args(args: &TimelineArgs) -> Result<()> {
    if args.evtx.is_empty() && args.trace.is_empty() {
        anyhow::bail!("No input files: provide at least one --evtx or --trace file");
    }
    for path in args.evtx.iter().chain(args.trace.iter()) {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
    }
    Ok(())
}

/// Execute the timeline command end to end.
pub fn execute_timeline(args: TimelineArgs) -> Result<()> {
    let mut store = TimelineStore::new();

    for path in &args.evtx {
        let source = source_name("EVTX", path);
        let job = spawn_event_log_job(path.clone(), source.clone());
        let batch = job
            .wait()
            .with_context(|| format!("parsing event log {}", path.display()))?;
        if batch.summary.has_failures() {
            warn!(
                "'{}': {} of {} records failed to parse",
                source, batch.summary.failed, batch.summary.records_seen
            );
        }
        info!(
            "'{}': {} events, range {:?}..{:?}",
            source, batch.summary.parsed, batch.min_ts, batch.max_ts
        );
        store.add(&source, batch.events);
    }

    for path in &args.trace {
        let views = parse_request_trace(path)
            .with_context(|| format!("parsing request trace {}", path.display()))?;
        let source = views
            .events
            .first()
            .map(|ev| ev.source_id.clone())
            .unwrap_or_else(|| source_name("IIS", path));
        info!("'{}': {} trace events", source, views.events.len());
        store.add(&source, views.events);
    }

    let series = aggregate(&store, args.mode);
    info!(
        "Computed {} series from {} sources",
        series.len(),
        store.len()
    );
    write_series(&series, &args.output)?;

    println!("Wrote {} series to {}", series.len(), args.output.display());
    Ok(())
}

fn source_name(prefix: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    format!("{}:{}", prefix, stem)
}

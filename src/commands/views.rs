//! Views command: parse one request trace and report its categorized views.

use crate::classifier::Severity;
use crate::parser::request_trace::{parse_request_trace, FrebVersion, TraceViews};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Arguments for the views command
#[derive(Debug)]
pub struct ViewsArgs {
    pub file: PathBuf,
    /// Summary-transform version key; validated against the known set
    pub version: Option<String>,
    /// Optional JSON dump of the views
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ViewReport<'a> {
    name: &'a str,
    count: usize,
    events: Vec<EventReport<'a>>,
}

#[derive(Serialize)]
struct EventReport<'a> {
    opcode: &'a str,
    time: &'a str,
    severity: &'static str,
    duration_ms: f64,
}

/// Execute the views command.
pub fn execute_views(args: ViewsArgs) -> Result<()> {
    // Reject an unknown transform key before touching the document
    if let Some(key) = &args.version {
        let version = FrebVersion::from_str(key)?;
        println!(
            "Summary transform: {} ({})",
            version.key(),
            version.stylesheet().display()
        );
    }

    let views = parse_request_trace(&args.file)
        .with_context(|| format!("parsing request trace {}", args.file.display()))?;

    println!("Parsed {} events", views.events.len());
    for view in &views.views {
        println!("  {:<32} {:>5}", view.name, view.indices.len());
    }
    if !views.siblings.is_empty() {
        println!("{} sibling documents in directory", views.siblings.len());
    }

    if let Some(output) = &args.output {
        let report = build_report(&views);
        let file = std::fs::File::create(output)
            .with_context(|| format!("creating {}", output.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report)?;
        println!("Wrote view report to {}", output.display());
    }

    Ok(())
}

fn build_report(views: &TraceViews) -> Vec<ViewReport<'_>> {
    views
        .views
        .iter()
        .map(|view| ViewReport {
            name: &view.name,
            count: view.indices.len(),
            events: views
                .events_in(view)
                .map(|ev| EventReport {
                    opcode: ev.attr("Opcode").unwrap_or("N/A"),
                    time: &ev.timestamp_text,
                    severity: Severity::from_level(&ev.level).label(),
                    duration_ms: ev.duration_ms.unwrap_or(0.0),
                })
                .collect(),
        })
        .collect()
}

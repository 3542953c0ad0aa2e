//! Event-log container parser.
//!
//! Walks an exported container record by record, normalizing each XML
//! fragment into a `NormalizedEvent`. A record that fails to parse is
//! logged, counted and skipped; only a failure to open the container
//! itself aborts the job.

use crate::parser::job::CancelToken;
use crate::parser::record_xml::parse_record_fragment;
use crate::parser::schema::{NormalizedEvent, ParseSummary};
use crate::parser::timestamp::{parse_system_time, scan_duration_ms, scan_iso_timestamp};
use crate::utils::config::PROGRESS_LOG_INTERVAL;
use crate::utils::error::ParseError;
use evtx::EvtxParser;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Collapses runs of non-word characters into `_` for identifier-safe keys
static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid key regex"));

/// Result of one container parse: the normalized batch, the observed
/// timestamp range and the per-record failure summary.
#[derive(Debug)]
pub struct EventLogBatch {
    pub events: Vec<NormalizedEvent>,
    pub min_ts: Option<f64>,
    pub max_ts: Option<f64>,
    pub summary: ParseSummary,
}

/// Parse one event-log container into a normalized batch.
///
/// Tracks the running min/max of extracted timestamps in the same pass.
/// Cancellation is checked once per record.
///
/// # Errors
/// * `ParseError::Container` - the container could not be opened
/// * `ParseError::Cancelled` - the job's cancel token was triggered
pub fn parse_event_log(
    path: &Path,
    source_id: &str,
    cancel: &CancelToken,
) -> Result<EventLogBatch, ParseError> {
    info!("Starting event-log parse for: {}", path.display());

    let mut parser =
        EvtxParser::from_path(path).map_err(|e| ParseError::Container(e.to_string()))?;

    let mut batch = EventLogBatch {
        events: Vec::new(),
        min_ts: None,
        max_ts: None,
        summary: ParseSummary::default(),
    };

    for (index, record) in parser.records().enumerate() {
        if cancel.is_cancelled() {
            info!("Event-log parse cancelled at record {}", index + 1);
            return Err(ParseError::Cancelled);
        }
        let number = index as u64 + 1;
        if number % PROGRESS_LOG_INTERVAL == 0 {
            info!("Parsing record number: {}", number);
        }

        let xml = match record {
            Ok(rec) => rec.data,
            Err(e) => {
                warn!("Failed to read record {}: {}", number, e);
                batch.summary.record_failed(number, e.to_string());
                continue;
            }
        };

        match normalize_record(source_id, &xml) {
            Ok(event) => {
                if let Some(ts) = event.timestamp_epoch {
                    if batch.min_ts.is_none_or(|min| ts < min) {
                        batch.min_ts = Some(ts);
                        debug!("Updated min_ts to: {}", ts);
                    }
                    if batch.max_ts.is_none_or(|max| ts > max) {
                        batch.max_ts = Some(ts);
                        debug!("Updated max_ts to: {}", ts);
                    }
                }
                batch.events.push(event);
                batch.summary.record_ok();
            }
            Err(e) => {
                warn!("Failed to parse record {}: {}", number, e);
                batch.summary.record_failed(number, e.to_string());
            }
        }
    }

    info!(
        "Completed event-log parse for '{}': {} parsed, {} failed",
        path.display(),
        batch.summary.parsed,
        batch.summary.failed
    );
    Ok(batch)
}

/// Normalize one record fragment.
///
/// Timestamp policy: the structured `SystemTime` attribute wins; when it
/// yields nothing, the data values are scanned in order for the first
/// ISO-8601-like substring. The first `<digits> ms` match across the data
/// values sets the duration.
pub fn normalize_record(source_id: &str, xml: &str) -> Result<NormalizedEvent, ParseError> {
    let rec = parse_record_fragment(xml)?;

    let mut event = NormalizedEvent::new(source_id);
    event.level = or_unknown(&rec.level);
    event.push_attr("EventID", or_unknown(&rec.event_id));
    event.push_attr("RecordNumber", rec.record_number.clone());
    event.push_attr("ProviderName", or_unknown(&rec.provider));
    event.push_attr("Channel", or_unknown(&rec.channel));
    event.push_attr("Computer", or_unknown(&rec.computer));

    event.timestamp_epoch = parse_system_time(&rec.system_time);
    event.timestamp_text = rec.system_time.clone();

    for (name, value) in &rec.data {
        event.push_attr(normalize_key(name), value.clone());
        if value.is_empty() {
            continue;
        }
        if event.duration_ms.is_none() {
            event.duration_ms = scan_duration_ms(value);
        }
        if event.timestamp_epoch.is_none() {
            if let Some((epoch, text)) = scan_iso_timestamp(value) {
                event.timestamp_epoch = Some(epoch);
                event.timestamp_text = text;
            }
        }
    }

    event.raw_payload = rec.raw;
    Ok(event)
}

/// Collapse non-word characters in an attribute name to `_`.
pub fn normalize_key(name: &str) -> String {
    KEY_PATTERN.replace_all(name, "_").into_owned()
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

//! Request-trace document parser.
//!
//! A trace document carries the ordered event sequence of one logical
//! request. Events are normalized with inter-event durations, then the
//! view table is evaluated once to build the eight categorized views.

use crate::classifier;
use crate::parser::record_xml::parse_event_elements;
use crate::parser::schema::NormalizedEvent;
use crate::parser::timestamp::parse_system_time;
use crate::utils::error::{ParseError, VersionError};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Known target-platform release lines for the summary transform.
///
/// The transform itself is an external rendering step; this type only
/// guarantees the selected key is one of the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrebVersion {
    V2008R2,
    V2012,
    V2012R2,
    V2016,
    V2019,
    V2022,
}

impl FrebVersion {
    pub const ALL: &'static [FrebVersion] = &[
        FrebVersion::V2008R2,
        FrebVersion::V2012,
        FrebVersion::V2012R2,
        FrebVersion::V2016,
        FrebVersion::V2019,
        FrebVersion::V2022,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FrebVersion::V2008R2 => "2008R2",
            FrebVersion::V2012 => "2012",
            FrebVersion::V2012R2 => "2012R2",
            FrebVersion::V2016 => "2016",
            FrebVersion::V2019 => "2019",
            FrebVersion::V2022 => "2022",
        }
    }

    /// Stylesheet path handed to the external transform step.
    pub fn stylesheet(&self) -> PathBuf {
        ["resources", "freb", &format!("{}.xsl", self.key())]
            .iter()
            .collect()
    }
}

impl FromStr for FrebVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.key() == s)
            .ok_or_else(|| VersionError(s.to_string()))
    }
}

/// One named view: indices into the trace's contiguous event sequence.
#[derive(Debug, Clone, Serialize)]
pub struct TraceView {
    pub name: String,
    pub indices: Vec<usize>,
}

/// The parsed document: ordered events, the eight categorized views,
/// the raw text for the external transform, and the sibling file index
/// for navigation.
#[derive(Debug)]
pub struct TraceViews {
    pub events: Vec<NormalizedEvent>,
    pub views: Vec<TraceView>,
    pub raw_document: String,
    pub siblings: Vec<PathBuf>,
}

impl TraceViews {
    pub fn view(&self, name: &str) -> Option<&TraceView> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Events belonging to a view, in trace order.
    pub fn events_in<'a>(&'a self, view: &'a TraceView) -> impl Iterator<Item = &'a NormalizedEvent> {
        view.indices.iter().map(|&i| &self.events[i])
    }
}

/// Parse one request-trace document into categorized views.
///
/// # Errors
/// * `ParseError::Io` - the document could not be read
/// * `ParseError::Xml` - the document is not well-formed
/// * `ParseError::NoEvents` - no `Event` elements present
pub fn parse_request_trace(path: &Path) -> Result<TraceViews, ParseError> {
    info!("Parsing request trace: {}", path.display());

    let raw_document = std::fs::read_to_string(path)?;
    let source_id = trace_source_id(path);
    let records = parse_event_elements(&raw_document)?;
    if records.is_empty() {
        return Err(ParseError::NoEvents);
    }

    let mut events = Vec::with_capacity(records.len());
    let mut prev_ts: Option<f64> = None;
    for rec in records {
        let mut event = NormalizedEvent::new(source_id.clone());
        event.timestamp_epoch = parse_system_time(&rec.system_time);
        event.timestamp_text = rec.system_time.clone();
        event.level = or_na(&rec.level);
        event.push_attr("Opcode", rec.opcode.clone().unwrap_or_else(|| "N/A".into()));
        for (name, value) in &rec.data {
            event.push_attr(name.clone(), value.clone());
        }

        // Duration is the delta to the previous event; 0 for the first
        // event or whenever either timestamp is missing.
        event.duration_ms = Some(match (prev_ts, event.timestamp_epoch) {
            (Some(prev), Some(current)) => (current - prev) * 1000.0,
            _ => 0.0,
        });
        prev_ts = event.timestamp_epoch;

        event.category = classifier::classify(&event);
        event.raw_payload = rec.raw;
        events.push(event);
    }

    let views = build_views(&events);
    for view in &views {
        debug!("View '{}': {} events", view.name, view.indices.len());
    }

    Ok(TraceViews {
        events,
        views,
        raw_document,
        siblings: list_sibling_documents(path),
    })
}

/// Evaluate the view table once over the event list.
fn build_views(events: &[NormalizedEvent]) -> Vec<TraceView> {
    classifier::VIEW_TABLE
        .iter()
        .map(|(name, predicate)| TraceView {
            name: name.to_string(),
            indices: events
                .iter()
                .enumerate()
                .filter(|(_, ev)| predicate(ev))
                .map(|(i, _)| i)
                .collect(),
        })
        .collect()
}

/// XML files next to the trace, for the rendering collaborator's
/// navigation list. Thin I/O concern; unreadable directories yield an
/// empty index.
pub fn list_sibling_documents(path: &Path) -> Vec<PathBuf> {
    let Some(dir) = path.parent() else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    files
}

fn trace_source_id(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    format!("IIS:{}", stem)
}

fn or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_keys_round_trip() {
        for version in FrebVersion::ALL {
            assert_eq!(FrebVersion::from_str(version.key()).unwrap(), *version);
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = FrebVersion::from_str("2025").unwrap_err();
        assert_eq!(err, VersionError("2025".to_string()));
    }

    #[test]
    fn test_stylesheet_path() {
        let path = FrebVersion::V2016.stylesheet();
        assert!(path.ends_with(Path::new("freb").join("2016.xsl")));
    }
}

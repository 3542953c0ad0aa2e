//! Common event model shared by every parser and consumer.
//!
//! Heterogeneous inputs (binary event-log records, request-trace events,
//! bare timestamp lists from the SQL-backed IIS store) are unified into
//! `NormalizedEvent` at the parsing boundary so downstream components
//! never branch on representation.

use serde::{Deserialize, Serialize};

/// A single normalized event, created once during parsing and never
/// mutated after classification.
///
/// `timestamp_epoch` is `None` only when no structured or fallback
/// timestamp could be extracted; sort/bin logic must tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Name of the source this event belongs to
    pub source_id: String,

    /// Epoch seconds, millisecond precision
    pub timestamp_epoch: Option<f64>,

    /// Original timestamp string, kept for display and fallback
    pub timestamp_text: String,

    /// Duration in milliseconds, when one could be extracted or computed
    pub duration_ms: Option<f64>,

    /// Level code as it appeared in the source (e.g. "2")
    pub level: String,

    /// Semantic category tag, set post-classification
    pub category: Option<String>,

    /// Ordered attribute map, insertion order preserved, keys unique
    pub attributes: Vec<(String, String)>,

    /// Opaque original document fragment, retained for re-rendering
    pub raw_payload: String,
}

impl NormalizedEvent {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            timestamp_epoch: None,
            timestamp_text: String::new(),
            duration_ms: None,
            level: String::new(),
            category: None,
            attributes: Vec::new(),
            raw_payload: String::new(),
        }
    }

    /// Wrap a bare epoch timestamp (e.g. from the SQL-backed IIS store).
    pub fn from_timestamp(source_id: impl Into<String>, timestamp_epoch: f64) -> Self {
        let mut ev = Self::new(source_id);
        ev.timestamp_epoch = Some(timestamp_epoch);
        ev
    }

    /// Wrap a `(timestamp, duration)` pair.
    pub fn from_pair(source_id: impl Into<String>, timestamp_epoch: f64, duration_ms: f64) -> Self {
        let mut ev = Self::from_timestamp(source_id, timestamp_epoch);
        ev.duration_ms = Some(duration_ms);
        ev
    }

    /// Look up an attribute by exact key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when the attribute exists with a non-empty value.
    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some_and(|v| !v.is_empty())
    }

    /// Insert an attribute, overwriting any existing value for the key
    /// while keeping the original insertion position.
    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }
}

/// One malformed record inside an otherwise-valid container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordError {
    /// 1-based record position in the container stream
    pub record: u64,
    pub message: String,
}

/// Counts of parsed vs. failed records for one parse job.
///
/// Delivered as part of the job's single completion message, never as
/// individual notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseSummary {
    pub records_seen: u64,
    pub parsed: u64,
    pub failed: u64,
    pub errors: Vec<RecordError>,
}

impl ParseSummary {
    pub fn record_ok(&mut self) {
        self.records_seen += 1;
        self.parsed += 1;
    }

    pub fn record_failed(&mut self, record: u64, message: impl Into<String>) {
        self.records_seen += 1;
        self.failed += 1;
        self.errors.push(RecordError {
            record,
            message: message.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// One histogram bucket over a fixed-width time axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBin {
    /// Inclusive start edge, epoch seconds
    pub start: f64,
    /// Exclusive end edge, epoch seconds
    pub end: f64,
    pub count: u64,
    /// Short display strings for hover/detail; may be empty
    pub samples: Vec<String>,
}

/// One threshold-filtered scatter sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub timestamp: f64,
    /// The duration used for threshold filtering, in milliseconds
    pub value: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_attr_overwrites_in_place() {
        let mut ev = NormalizedEvent::new("src");
        ev.push_attr("a", "1");
        ev.push_attr("b", "2");
        ev.push_attr("a", "3");

        assert_eq!(ev.attributes.len(), 2);
        assert_eq!(ev.attributes[0], ("a".to_string(), "3".to_string()));
        assert_eq!(ev.attr("b"), Some("2"));
    }

    #[test]
    fn test_has_attr_ignores_empty_values() {
        let mut ev = NormalizedEvent::new("src");
        ev.push_attr("FilterName", "");
        assert!(!ev.has_attr("FilterName"));
        ev.push_attr("FilterName", "Compression");
        assert!(ev.has_attr("FilterName"));
    }

    #[test]
    fn test_parse_summary_counts() {
        let mut summary = ParseSummary::default();
        summary.record_ok();
        summary.record_ok();
        summary.record_failed(3, "bad xml");

        assert_eq!(summary.records_seen, 3);
        assert_eq!(summary.parsed, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.errors[0].record, 3);
    }
}

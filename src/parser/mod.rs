//! Log parsing and the normalized event model.
//!
//! This module handles:
//! - Walking exported event-log containers record by record
//! - Parsing request-trace documents into categorized views
//! - Timestamp/duration extraction heuristics
//! - Background parse jobs with cooperative cancellation

pub mod event_log;
pub mod job;
pub mod record_xml;
pub mod request_trace;
pub mod schema;
pub mod timestamp;

// Re-export main types
pub use event_log::{parse_event_log, EventLogBatch};
pub use job::{spawn_event_log_job, spawn_request_trace_job, CancelToken, ParseJob};
pub use request_trace::{parse_request_trace, FrebVersion, TraceView, TraceViews};
pub use schema::{NormalizedEvent, ParseSummary, RecordError, ScatterPoint, TimeBin};

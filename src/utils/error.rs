//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Per-record failures inside an otherwise-valid container are *not* errors
//! at this level: they are accumulated into a `ParseSummary` and reported
//! alongside the successful batch.

use thiserror::Error;

/// Fatal errors that abort a whole parse job with no partial result.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open event-log container: {0}")]
    Container(String),

    #[error("malformed XML document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document contains no Event elements")]
    NoEvents,

    #[error("parse job was cancelled")]
    Cancelled,

    #[error("parse job terminated without delivering a result")]
    JobTerminated,
}

/// Errors from span operations on the timeline store.
///
/// These are rejected synchronously and leave store state unchanged.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("invalid span: start {start} must be before end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("unknown source: {0}")]
    UnknownSource(String),
}

/// An unrecognized request-trace transform version key.
///
/// Rejected before any transform is attempted.
#[derive(Error, Debug, PartialEq)]
#[error("unknown trace transform version: {0}")]
pub struct VersionError(pub String);

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

//! Winlog Timeline
//!
//! Event normalization and timeline aggregation for Windows event logs
//! and IIS failed request traces.
//!
//! Heterogeneous timestamped logs are parsed into a common event model,
//! classified, windowed per source and aggregated into time-bucketed
//! series (histogram bins or threshold-filtered scatter points) that a
//! rendering surface can draw on one comparable time axis.
//!
//! This crate provides the core implementation behind the
//! `winlog-timeline` CLI tool.

pub mod aggregator;
pub mod classifier;
pub mod commands;
pub mod output;
pub mod parser;
pub mod store;
pub mod utils;

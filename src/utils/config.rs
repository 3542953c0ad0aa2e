//! Configuration and constants for the engine.

/// XML namespace used by Windows event records and request-trace documents
pub const EVENT_NAMESPACE: &str = "http://schemas.microsoft.com/win/2004/08/events/event";

/// Fixed histogram bin width, in seconds
pub const HISTOGRAM_BIN_WIDTH_SECS: f64 = 60.0;

/// Maximum number of scatter points emitted per source.
/// Larger filtered sets are down-sampled with even temporal spread.
pub const SCATTER_MAX_POINTS: usize = 5000;

/// Maximum number of per-bin hover sample strings kept in a histogram bin
pub const MAX_BIN_SAMPLES: usize = 5;

/// Log a progress line every N records while parsing a container
pub const PROGRESS_LOG_INTERVAL: u64 = 1000;

//! Per-source event storage with span filtering.
//!
//! Each named source keeps an immutable `original` sequence and a
//! `working` sequence that span operations rewrite from `original`
//! outright. `working` is always an order-preserving subsequence of
//! `original`. Mutation and aggregation are serialized by the borrow
//! checker (`&mut self` vs `&self`); the store is not designed for
//! concurrent mutation.

use crate::parser::schema::NormalizedEvent;
use crate::utils::error::FilterError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// One named source: the immutable original batch and the current
/// filtered working set.
#[derive(Debug, Clone)]
pub struct EventSource {
    pub name: String,
    original: Vec<NormalizedEvent>,
    working: Vec<NormalizedEvent>,
}

impl EventSource {
    pub fn original(&self) -> &[NormalizedEvent] {
        &self.original
    }

    pub fn working(&self) -> &[NormalizedEvent] {
        &self.working
    }
}

/// Owns every source currently on the timeline.
#[derive(Debug, Default)]
pub struct TimelineStore {
    sources: BTreeMap<String, EventSource>,
}

impl TimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both collections for `source` wholesale. A second `add`
    /// with the same name overwrites, never merges.
    pub fn add(&mut self, source: &str, events: Vec<NormalizedEvent>) {
        if events.is_empty() {
            warn!("No events provided by '{}'", source);
        }
        debug!("Added {} events from '{}'", events.len(), source);
        self.sources.insert(
            source.to_string(),
            EventSource {
                name: source.to_string(),
                working: events.clone(),
                original: events,
            },
        );
    }

    /// Drop a source. Removing an unknown source is a no-op.
    pub fn remove(&mut self, source: &str) {
        if self.sources.remove(source).is_some() {
            debug!("Removed events for source '{}'", source);
        }
    }

    /// Restrict `working` to events with `start <= timestamp <= end`.
    ///
    /// Events with no timestamp are excluded. Returns the retained count.
    /// On error the working set is unchanged.
    pub fn set_span(&mut self, source: &str, start: f64, end: f64) -> Result<usize, FilterError> {
        if start >= end {
            return Err(FilterError::InvalidRange { start, end });
        }
        let entry = self
            .sources
            .get_mut(source)
            .ok_or_else(|| FilterError::UnknownSource(source.to_string()))?;

        entry.working = entry
            .original
            .iter()
            .filter(|ev| {
                ev.timestamp_epoch
                    .is_some_and(|ts| start <= ts && ts <= end)
            })
            .cloned()
            .collect();
        debug!(
            "Source '{}' span set to {} events (filtered from {})",
            source,
            entry.working.len(),
            entry.original.len()
        );
        Ok(entry.working.len())
    }

    /// Restore `working` to the full original sequence.
    pub fn reset_span(&mut self, source: &str) -> Result<(), FilterError> {
        let entry = self
            .sources
            .get_mut(source)
            .ok_or_else(|| FilterError::UnknownSource(source.to_string()))?;
        entry.working = entry.original.clone();
        debug!(
            "Source '{}' span reset to full range ({} events)",
            source,
            entry.working.len()
        );
        Ok(())
    }

    /// Min/max timestamp over the working set, skipping untimestamped
    /// events. `None` when the source is unknown, empty or untimed.
    pub fn bounds(&self, source: &str) -> Option<(f64, f64)> {
        let entry = self.sources.get(source)?;
        let mut bounds: Option<(f64, f64)> = None;
        for ts in entry.working.iter().filter_map(|ev| ev.timestamp_epoch) {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(ts), max.max(ts)),
                None => (ts, ts),
            });
        }
        bounds
    }

    pub fn get(&self, source: &str) -> Option<&EventSource> {
        self.sources.get(source)
    }

    /// Sources in stable (name) order.
    pub fn sources(&self) -> impl Iterator<Item = &EventSource> {
        self.sources.values()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_events(source: &str, timestamps: &[f64]) -> Vec<NormalizedEvent> {
        timestamps
            .iter()
            .map(|&ts| NormalizedEvent::from_timestamp(source, ts))
            .collect()
    }

    #[test]
    fn test_bounds_skip_untimestamped() {
        let mut store = TimelineStore::new();
        let mut events = timed_events("a", &[100.0, 50.0, 200.0]);
        events.push(NormalizedEvent::new("a"));
        store.add("a", events);

        assert_eq!(store.bounds("a"), Some((50.0, 200.0)));
        assert_eq!(store.bounds("missing"), None);
    }

    #[test]
    fn test_bounds_none_when_no_timestamps() {
        let mut store = TimelineStore::new();
        store.add("a", vec![NormalizedEvent::new("a")]);
        assert_eq!(store.bounds("a"), None);
    }

    #[test]
    fn test_set_span_unknown_source() {
        let mut store = TimelineStore::new();
        assert_eq!(
            store.set_span("nope", 0.0, 10.0),
            Err(FilterError::UnknownSource("nope".to_string()))
        );
    }
}

//! Threshold-filtered, down-sampled scatter series.

use crate::aggregator::color::color_for_source;
use crate::aggregator::ScatterSeries;
use crate::parser::schema::ScatterPoint;
use crate::parser::timestamp::format_epoch;
use crate::store::EventSource;
use crate::utils::config::SCATTER_MAX_POINTS;
use log::debug;

/// Build one source's scatter series; `None` when no event passes the
/// threshold (the source is skipped).
///
/// Durations are coerced to 0 when missing, so a threshold of 0 keeps
/// every timestamped event. Sequences longer than the point cap are
/// down-sampled over evenly spaced indices so the temporal spread is
/// preserved, first and last points included.
pub fn scatter_series(source: &EventSource, threshold: f64) -> Option<ScatterSeries> {
    let mut points: Vec<ScatterPoint> = source
        .working()
        .iter()
        .filter_map(|ev| {
            let ts = ev.timestamp_epoch?;
            let value = ev.duration_ms.unwrap_or(0.0);
            (value >= threshold).then(|| ScatterPoint {
                timestamp: ts,
                value,
                label: format!(
                    "Timestamp: {} | Time Taken: {} ms",
                    format_epoch(ts),
                    value
                ),
            })
        })
        .collect();

    if points.is_empty() {
        return None;
    }
    points.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    if points.len() > SCATTER_MAX_POINTS {
        debug!(
            "Down-sampling '{}' from {} to {} points",
            source.name,
            points.len(),
            SCATTER_MAX_POINTS
        );
        points = sample_indices(points.len(), SCATTER_MAX_POINTS)
            .into_iter()
            .map(|i| points[i].clone())
            .collect();
    }

    Some(ScatterSeries {
        source: source.name.clone(),
        color: color_for_source(&source.name),
        points,
    })
}

/// `max_points` evenly spaced indices over `0..len`, inclusive of the
/// first and last index. Requires `len > max_points >= 2`.
pub(crate) fn sample_indices(len: usize, max_points: usize) -> Vec<usize> {
    (0..max_points)
        .map(|i| i * (len - 1) / (max_points - 1))
        .collect()
}

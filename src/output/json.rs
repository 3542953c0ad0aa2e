//! JSON series output writer.
//!
//! Writes aggregated series to JSON files with proper formatting.

use crate::aggregator::SourceSeries;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write the aggregated series to a JSON file.
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_series(
    series: &[SourceSeries],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} series to: {}", series.len(), output_path.display());
    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, series)?;

    debug!("Series written successfully");
    Ok(())
}

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("empty output path".to_string()));
    }
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{HistogramSeries, Rgb};
    use crate::parser::schema::TimeBin;

    #[test]
    fn test_write_series_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("series.json");

        let series = vec![SourceSeries::Histogram(HistogramSeries {
            source: "EVTX:system".to_string(),
            color: Rgb { r: 120, g: 0, b: 0 },
            bins: vec![TimeBin {
                start: 0.0,
                end: 60.0,
                count: 2,
                samples: vec!["a".into()],
            }],
        })];

        write_series(&series, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["mode"], "histogram");
        assert_eq!(value[0]["color"], "rgb(120, 0, 0)");
        assert_eq!(value[0]["bins"][0]["count"], 2);
    }

    #[test]
    fn test_directory_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_series(&[], dir.path()),
            Err(OutputError::InvalidPath(_))
        ));
    }
}

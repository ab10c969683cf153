use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::model::{Signal, MIN_SUBSET};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to turn an on-disk resource into a [`Signal`].
///
/// Fatal at startup; recoverable (status message) when re-loading a file
/// through the UI.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("row {row}: '{value}' is not a parseable timestamp")]
    BadTimestamp { row: usize, value: String },
    #[error("row {row}: timestamp does not increase over the previous row")]
    NonMonotonicTimestamps { row: usize },
    #[error("dataset has {rows} rows, need at least {MIN_SUBSET}")]
    TooShort { rows: usize },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// One row of the source dataset. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: String,
    noisy_signal: f64,
}

/// Load a signal from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with `timestamp` and `noisy_signal` columns
/// * `.json` – `[{ "timestamp": "...", "noisy_signal": 0.42 }, ...]`
pub fn load_file(path: &Path) -> Result<Signal, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Signal, DataLoadError> {
    let reader = csv::Reader::from_path(path)?;
    load_csv_records(reader)
}

fn load_csv_records<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Signal, DataLoadError> {
    let mut records = Vec::new();
    for result in reader.deserialize::<RawRecord>() {
        records.push(result?);
    }
    build_signal(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` shape.
fn load_json(path: &Path) -> Result<Signal, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<RawRecord> = serde_json::from_str(&text)?;
    build_signal(records)
}

// ---------------------------------------------------------------------------
// Validation and assembly
// ---------------------------------------------------------------------------

fn build_signal(records: Vec<RawRecord>) -> Result<Signal, DataLoadError> {
    if records.len() < MIN_SUBSET {
        return Err(DataLoadError::TooShort {
            rows: records.len(),
        });
    }

    let mut timestamps = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());

    for (row, rec) in records.into_iter().enumerate() {
        let ts = parse_timestamp(&rec.timestamp).ok_or_else(|| DataLoadError::BadTimestamp {
            row,
            value: rec.timestamp.clone(),
        })?;
        if let Some(prev) = timestamps.last() {
            // Strictly increasing: duplicates are rejected too.
            if ts <= *prev {
                return Err(DataLoadError::NonMonotonicTimestamps { row });
            }
        }
        timestamps.push(ts);
        values.push(rec.noisy_signal);
    }

    Ok(Signal::new(timestamps, values))
}

/// Parse the formats the dataset shows up in: RFC 3339, the Pandas default
/// `%Y-%m-%d %H:%M:%S`, and bare dates.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_of(rows: &[(&str, f64)]) -> String {
        let mut s = String::from("timestamp,noisy_signal\n");
        for (ts, v) in rows {
            s.push_str(&format!("{ts},{v}\n"));
        }
        s
    }

    fn hourly_rows(n: usize) -> Vec<(String, f64)> {
        (0..n)
            .map(|i| (format!("2023-01-01 {:02}:00:00", i % 24), 0.0))
            .collect()
    }

    #[test]
    fn loads_well_formed_csv() {
        let rows: Vec<(String, f64)> = (0..60)
            .map(|i| {
                let day = 1 + i / 24;
                let hour = i % 24;
                (format!("2023-01-{day:02} {hour:02}:00:00"), i as f64 * 0.1)
            })
            .collect();
        let borrowed: Vec<(&str, f64)> = rows.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        let text = csv_of(&borrowed);
        let reader = csv::Reader::from_reader(text.as_bytes());
        let signal = load_csv_records(reader).unwrap();
        assert_eq!(signal.len(), 60);
        assert!((signal.values[10] - 1.0).abs() < 1e-12);
        assert_eq!(signal.xs[24], 24.0);
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        // Hour wraps back to 00:00 at row 24 on the same date.
        let rows = hourly_rows(60);
        let borrowed: Vec<(&str, f64)> = rows.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        let text = csv_of(&borrowed);
        let reader = csv::Reader::from_reader(text.as_bytes());
        let err = load_csv_records(reader).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::NonMonotonicTimestamps { row: 24 }
        ));
    }

    #[test]
    fn rejects_short_datasets() {
        let text = csv_of(&[("2023-01-01 00:00:00", 1.0), ("2023-01-01 01:00:00", 2.0)]);
        let reader = csv::Reader::from_reader(text.as_bytes());
        let err = load_csv_records(reader).unwrap_err();
        assert!(matches!(err, DataLoadError::TooShort { rows: 2 }));
    }

    #[test]
    fn rejects_bad_timestamp_text() {
        let mut rows: Vec<(String, f64)> = (0..50)
            .map(|i| (format!("2023-01-01 00:{i:02}:00"), 0.0))
            .collect();
        rows[7].0 = "not-a-time".to_string();
        let borrowed: Vec<(&str, f64)> = rows.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        let text = csv_of(&borrowed);
        let reader = csv::Reader::from_reader(text.as_bytes());
        let err = load_csv_records(reader).unwrap_err();
        assert!(matches!(err, DataLoadError::BadTimestamp { row: 7, .. }));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("data/storms.parquet")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedExtension(e) if e == "parquet"));
    }

    #[test]
    fn parses_all_supported_timestamp_formats() {
        assert!(parse_timestamp("2023-01-01T12:30:00Z").is_some());
        assert!(parse_timestamp("2023-01-01 12:30:00").is_some());
        assert!(parse_timestamp("2023-01-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}

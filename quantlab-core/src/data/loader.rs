//! Benchmark loader: newest-first CSV into an ascending BenchmarkSeries.
//!
//! Source layout: one `timestamp,value` row per trading day, most recent day
//! first, timestamps like `2024-01-02T00:00:00.000Z`. The loader reverses the
//! rows, drops the time-of-day, and builds the date index.
//!
//! Every failure here is a [`LoadError`]. The caller decides whether that is
//! fatal (startup) or recoverable (explicit reload).

use crate::domain::{BenchmarkPoint, BenchmarkSeries, SeriesError};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp layout of the source file (UTC). The source writes milliseconds,
/// but `%.3f` also accepts a missing or longer fraction when parsing. Only the
/// calendar date is kept, so that looseness is harmless.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Errors from loading a benchmark source. `row` is the 1-based line number.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open benchmark source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read benchmark source: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: expected 2 fields, found {found}")]
    MalformedRow { row: usize, found: usize },

    #[error("row {row}: unparseable timestamp '{raw}'")]
    InvalidTimestamp { row: usize, raw: String },

    #[error("row {row}: unparseable index value '{raw}'")]
    InvalidValue { row: usize, raw: String },

    #[error("row {row}: duplicate trading date {date}")]
    DuplicateDate { row: usize, date: NaiveDate },

    #[error("row {row}: trading date {date} is not newer than the row below it ({previous})")]
    NonAscendingDate {
        row: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Options controlling how a source is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOptions {
    /// Skip one leading header row.
    pub has_header: bool,
}

/// Reads benchmark sources into [`BenchmarkSeries`] snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenchmarkLoader {
    options: LoaderOptions,
}

impl BenchmarkLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Load a source file from disk.
    pub fn load_path(&self, path: &Path) -> Result<BenchmarkSeries, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_reader(BufReader::new(file))
    }

    /// Load from any reader holding newest-first rows.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<BenchmarkSeries, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.options.has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header_rows = usize::from(self.options.has_header);
        let mut newest_first = Vec::new();

        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = idx + 1 + header_rows;

            if record.len() != 2 {
                return Err(LoadError::MalformedRow {
                    row,
                    found: record.len(),
                });
            }

            let raw_ts = &record[0];
            let trading_date =
                parse_trading_date(raw_ts).ok_or_else(|| LoadError::InvalidTimestamp {
                    row,
                    raw: raw_ts.to_string(),
                })?;

            let raw_value = &record[1];
            let index_value = raw_value
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::InvalidValue {
                    row,
                    raw: raw_value.to_string(),
                })?;

            newest_first.push(BenchmarkPoint::new(trading_date, index_value));
        }

        let total = newest_first.len();
        newest_first.reverse();
        let ascending = newest_first;

        // Ascending position p came from data row (total - p).
        let source_row = |position: usize| total - position + header_rows;

        let series = BenchmarkSeries::from_ascending(ascending).map_err(|e| match e {
            SeriesError::DuplicateDate { date, position } => LoadError::DuplicateDate {
                row: source_row(position),
                date,
            },
            SeriesError::NonAscendingDate {
                date,
                previous,
                position,
            } => LoadError::NonAscendingDate {
                row: source_row(position),
                date,
                previous,
            },
        })?;

        tracing::debug!(
            rows = series.len(),
            first = ?series.first().map(|p| p.trading_date),
            last = ?series.last().map(|p| p.trading_date),
            "parsed benchmark source"
        );

        Ok(series)
    }
}

/// Parse a source timestamp into its UTC calendar date.
pub fn parse_trading_date(raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|ts| ts.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn load(csv: &str) -> Result<BenchmarkSeries, LoadError> {
        BenchmarkLoader::default().load_reader(csv.as_bytes())
    }

    #[test]
    fn reverses_newest_first_rows() {
        let series = load(
            "2024-01-04T00:00:00.000Z,105\n\
             2024-01-03T00:00:00.000Z,102\n\
             2024-01-02T00:00:00.000Z,100\n",
        )
        .unwrap();

        assert_eq!(series.values(), vec![100.0, 102.0, 105.0]);
        assert_eq!(series.position_of(date("2024-01-02")), Some(0));
        assert_eq!(series.position_of(date("2024-01-03")), Some(1));
        assert_eq!(series.position_of(date("2024-01-04")), Some(2));
    }

    #[test]
    fn drops_time_of_day() {
        assert_eq!(
            parse_trading_date("2024-03-15T06:30:00.123Z"),
            Some(date("2024-03-15"))
        );
        assert_eq!(parse_trading_date("2024-03-15"), None);
        assert_eq!(parse_trading_date("15/03/2024 06:30"), None);
    }

    #[test]
    fn fraction_digits_are_not_significant() {
        for raw in [
            "2024-01-02T00:00:00Z",
            "2024-01-02T00:00:00.1Z",
            "2024-01-02T00:00:00.000Z",
            "2024-01-02T00:00:00.1234567Z",
        ] {
            assert_eq!(parse_trading_date(raw), Some(date("2024-01-02")), "{raw}");
        }
        assert_eq!(parse_trading_date("2024-01-02T00:00:00.000"), None);
    }

    #[test]
    fn empty_source_gives_empty_series() {
        let series = load("").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn header_row_is_skipped_when_configured() {
        let loader = BenchmarkLoader::new(LoaderOptions { has_header: true });
        let series = loader
            .load_reader("date,close\n2024-01-02T00:00:00.000Z,2655.28\n".as_bytes())
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.value_at(0), Some(2655.28));
    }

    #[test]
    fn header_row_without_option_is_a_bad_timestamp() {
        let err = load("date,close\n2024-01-02T00:00:00.000Z,2655.28\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTimestamp { row: 1, .. }));
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let err = load(
            "2024-01-03T00:00:00.000Z,102\n\
             2024-01-02T00:00:00.000Z,100,7\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 2, found: 3 }));
    }

    #[test]
    fn unparseable_value_reports_row() {
        let err = load(
            "2024-01-03T00:00:00.000Z,abc\n\
             2024-01-02T00:00:00.000Z,100\n",
        )
        .unwrap_err();
        match err {
            LoadError::InvalidValue { row, raw } => {
                assert_eq!(row, 1);
                assert_eq!(raw, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let err = load("2024-01-02T00:00:00.000Z,NaN\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn duplicate_date_reports_source_row() {
        // Same calendar day twice; sub-day precision is not meaningful.
        let err = load(
            "2024-01-03T00:00:00.000Z,102\n\
             2024-01-02T15:00:00.000Z,101\n\
             2024-01-02T00:00:00.000Z,100\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateDate { row: 2, .. }));
    }

    #[test]
    fn oldest_first_source_is_rejected() {
        let err = load(
            "2024-01-02T00:00:00.000Z,100\n\
             2024-01-03T00:00:00.000Z,102\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::NonAscendingDate { row: 1, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BenchmarkLoader::default()
            .load_path(Path::new("/nonexistent/benchmark.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}

//! Series aligner: maps a strategy series onto the benchmark timeline.
//!
//! Two anchor policies:
//! - `Right`: the strategy's last value sits on the benchmark's latest day and
//!   earlier values step back one trading day each.
//! - `Dated`: the strategy carries start/end dates; its first value sits on the
//!   start date and each later value on the next trading day, bounded by the
//!   end date.
//!
//! When the strategy has more values than the window holds, the oldest values
//! are dropped and counted in `truncated_points`. This is reported, not failed.
//! A dated series shorter than its window stops before the end date; the
//! actual last day is `aligned_end_date`.

use crate::domain::{BenchmarkSeries, StrategyReturnSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a strategy series is placed on the benchmark's date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Last strategy value aligns with the most recent benchmark day.
    #[default]
    Right,
    /// Strategy values align by their explicit start and end dates.
    Dated,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("no benchmark data for {0}")]
    DateNotFound(NaiveDate),

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("date-anchored alignment requires a start and end date")]
    MissingDateSpan,

    #[error("strategy value at index {index} is not finite")]
    NonFiniteValue { index: usize },
}

/// Alignment bookkeeping returned alongside the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlignmentMeta {
    /// Oldest strategy values dropped because the window was shorter.
    pub truncated_points: usize,
    pub aligned_start_date: Option<NaiveDate>,
    pub aligned_end_date: Option<NaiveDate>,
}

/// Benchmark and strategy values over the same trading days.
///
/// `dates`, `benchmark` and `strategy` always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedComparison {
    pub dates: Vec<NaiveDate>,
    pub benchmark: Vec<f64>,
    pub strategy: Vec<f64>,
    pub meta: AlignmentMeta,
}

impl AlignedComparison {
    fn empty(truncated_points: usize) -> Self {
        Self {
            dates: Vec::new(),
            benchmark: Vec::new(),
            strategy: Vec::new(),
            meta: AlignmentMeta {
                truncated_points,
                ..AlignmentMeta::default()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Align `strategy` onto `benchmark` under `policy`.
pub fn align_series(
    benchmark: &BenchmarkSeries,
    strategy: &StrategyReturnSeries,
    policy: AnchorPolicy,
) -> Result<AlignedComparison, AlignError> {
    if strategy.is_empty() {
        return Ok(AlignedComparison::empty(0));
    }

    if let Some(index) = strategy.values().iter().position(|v| !v.is_finite()) {
        return Err(AlignError::NonFiniteValue { index });
    }

    // Half-open window [window_start, window_end) of benchmark positions.
    let (window_start, window_end) = match policy {
        AnchorPolicy::Right => (0, benchmark.len()),
        AnchorPolicy::Dated => {
            let span = strategy.span().ok_or(AlignError::MissingDateSpan)?;
            if span.start > span.end {
                return Err(AlignError::InvalidRange {
                    start: span.start,
                    end: span.end,
                });
            }
            let end = benchmark
                .position_of(span.end)
                .ok_or(AlignError::DateNotFound(span.end))?;
            let start = benchmark
                .position_of(span.start)
                .ok_or(AlignError::DateNotFound(span.start))?;
            (start, end + 1)
        }
    };

    let available = window_end - window_start;
    let kept = strategy.len().min(available);
    let truncated_points = strategy.len() - kept;

    if kept == 0 {
        return Ok(AlignedComparison::empty(truncated_points));
    }

    // A full window is the same under both policies. A short series hangs off
    // the end date when right-anchored and off the start date when dated.
    let first = match policy {
        AnchorPolicy::Right => window_end - kept,
        AnchorPolicy::Dated => window_start,
    };
    let points = &benchmark.points()[first..first + kept];
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.trading_date).collect();
    let benchmark_values: Vec<f64> = points.iter().map(|p| f64::from(p.index_value)).collect();
    let strategy_values = strategy.values()[truncated_points..].to_vec();

    let meta = AlignmentMeta {
        truncated_points,
        aligned_start_date: dates.first().copied(),
        aligned_end_date: dates.last().copied(),
    };

    Ok(AlignedComparison {
        dates,
        benchmark: benchmark_values,
        strategy: strategy_values,
        meta,
    })
}

//! Chart composer: shapes an aligned comparison for the presentation layer.
//!
//! `Absolute` passes both series through. `Relative` rebases both to 0 at the
//! first aligned point and expresses every later point as percent change from
//! that baseline, so index levels and strategy units can share one axis.

use crate::align::{AlignedComparison, AlignmentMeta};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    Absolute,
    #[default]
    Relative,
}

/// Which side of a comparison a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Benchmark,
    Strategy,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Benchmark => write!(f, "benchmark"),
            SeriesKind::Strategy => write!(f, "strategy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// First aligned value is absent, zero or non-finite.
    #[error("{series} has no usable baseline ({})", describe_baseline(.value))]
    InvalidBaseline {
        series: SeriesKind,
        value: Option<f64>,
    },

    /// Rebasing pushed a value out of `f64` range.
    #[error("{series} value at index {index} overflows when rebased to {base}")]
    RebaseOverflow {
        series: SeriesKind,
        index: usize,
        base: f64,
    },
}

fn describe_baseline(value: &Option<f64>) -> String {
    match value {
        Some(v) => format!("first value {v}"),
        None => "no aligned points".to_string(),
    }
}

/// Presentation-ready chart data: parallel arrays of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub mode: ChartMode,
    pub dates: Vec<NaiveDate>,
    pub benchmark: Vec<f64>,
    pub strategy: Vec<f64>,
    pub meta: AlignmentMeta,
}

/// Compose a comparison in the requested mode.
pub fn compose(
    comparison: AlignedComparison,
    mode: ChartMode,
) -> Result<ChartPayload, ComposeError> {
    match mode {
        ChartMode::Absolute => Ok(absolute(comparison)),
        ChartMode::Relative => relative_to_baseline(comparison),
    }
}

/// Pass both series through unchanged.
pub fn absolute(comparison: AlignedComparison) -> ChartPayload {
    ChartPayload {
        mode: ChartMode::Absolute,
        dates: comparison.dates,
        benchmark: comparison.benchmark,
        strategy: comparison.strategy,
        meta: comparison.meta,
    }
}

/// Rebase both series to percent change from their first aligned value.
pub fn relative_to_baseline(comparison: AlignedComparison) -> Result<ChartPayload, ComposeError> {
    let benchmark = rebase(&comparison.benchmark, SeriesKind::Benchmark)?;
    let strategy = rebase(&comparison.strategy, SeriesKind::Strategy)?;
    Ok(ChartPayload {
        mode: ChartMode::Relative,
        dates: comparison.dates,
        benchmark,
        strategy,
        meta: comparison.meta,
    })
}

/// Percent change from `values[0]`, measured against its magnitude so a
/// negative baseline keeps the direction of movement.
fn rebase(values: &[f64], series: SeriesKind) -> Result<Vec<f64>, ComposeError> {
    let base = *values
        .first()
        .ok_or(ComposeError::InvalidBaseline { series, value: None })?;
    if base == 0.0 || !base.is_finite() {
        return Err(ComposeError::InvalidBaseline {
            series,
            value: Some(base),
        });
    }
    let scale = base.abs();
    values
        .iter()
        .enumerate()
        .map(|(index, v)| {
            let pct = (v - base) / scale * 100.0;
            if pct.is_finite() {
                Ok(pct)
            } else {
                Err(ComposeError::RebaseOverflow {
                    series,
                    index,
                    base,
                })
            }
        })
        .collect()
}

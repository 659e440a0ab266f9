//! StrategyReturnSeries: a caller-owned strategy performance series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading dates of the first and last observation of a strategy series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Ordered strategy values over contiguous trading days, oldest first.
///
/// The span is optional: callers that only know the length rely on
/// right-anchored alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReturnSeries {
    values: Vec<f64>,
    #[serde(default)]
    span: Option<DateSpan>,
}

impl StrategyReturnSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, span: None }
    }

    pub fn with_span(values: Vec<f64>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            values,
            span: Some(DateSpan::new(start, end)),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn span(&self) -> Option<DateSpan> {
        self.span
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for StrategyReturnSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

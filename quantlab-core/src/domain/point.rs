//! BenchmarkPoint: one trading day of the benchmark index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index value for a single trading day.
///
/// The date carries no time-of-day component. Source timestamps are UTC and
/// are truncated to their UTC calendar date on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkPoint {
    pub trading_date: NaiveDate,
    pub index_value: f32,
}

impl BenchmarkPoint {
    pub fn new(trading_date: NaiveDate, index_value: f32) -> Self {
        Self {
            trading_date,
            index_value,
        }
    }
}

//! BenchmarkSeries: the immutable, ascending benchmark timeline.
//!
//! A series is validated once on construction and never mutated afterwards.
//! Every read method takes `&self`, so a series behind an `Arc` can be shared
//! across threads without synchronization.

use super::point::BenchmarkPoint;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Ordering violations found while building a series.
///
/// `position` is the zero-based index in the ascending sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("duplicate trading date {date} at position {position}")]
    DuplicateDate { date: NaiveDate, position: usize },

    #[error("trading date {date} at position {position} precedes {previous}")]
    NonAscendingDate {
        date: NaiveDate,
        previous: NaiveDate,
        position: usize,
    },
}

/// BLAKE3 content hash over every date and value of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesHash(String);

impl SeriesHash {
    fn compute(points: &[BenchmarkPoint]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for point in points {
            hasher.update(point.trading_date.to_string().as_bytes());
            hasher.update(&point.index_value.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chronologically ascending benchmark points with a date → position index.
///
/// Invariants:
/// - dates are strictly increasing (so no duplicates)
/// - `date_to_position[points[i].trading_date] == i` for every `i`
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    points: Vec<BenchmarkPoint>,
    date_to_position: HashMap<NaiveDate, usize>,
    hash: SeriesHash,
}

impl BenchmarkSeries {
    /// Build a series from points that are already in ascending date order.
    pub fn from_ascending(points: Vec<BenchmarkPoint>) -> Result<Self, SeriesError> {
        let mut date_to_position = HashMap::with_capacity(points.len());

        for (position, point) in points.iter().enumerate() {
            if let Some(previous) = position.checked_sub(1).map(|p| points[p].trading_date) {
                if point.trading_date == previous {
                    return Err(SeriesError::DuplicateDate {
                        date: point.trading_date,
                        position,
                    });
                }
                if point.trading_date < previous {
                    return Err(SeriesError::NonAscendingDate {
                        date: point.trading_date,
                        previous,
                        position,
                    });
                }
            }
            date_to_position.insert(point.trading_date, position);
        }

        let hash = SeriesHash::compute(&points);
        Ok(Self {
            points,
            date_to_position,
            hash,
        })
    }

    /// An empty but valid series.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            date_to_position: HashMap::new(),
            hash: SeriesHash::compute(&[]),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[BenchmarkPoint] {
        &self.points
    }

    /// All index values in ascending date order.
    pub fn values(&self) -> Vec<f32> {
        self.points.iter().map(|p| p.index_value).collect()
    }

    /// Zero-based position of a trading date, if the benchmark has it.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_to_position.get(&date).copied()
    }

    pub fn point_at(&self, position: usize) -> Option<&BenchmarkPoint> {
        self.points.get(position)
    }

    pub fn value_at(&self, position: usize) -> Option<f32> {
        self.point_at(position).map(|p| p.index_value)
    }

    pub fn first(&self) -> Option<&BenchmarkPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&BenchmarkPoint> {
        self.points.last()
    }

    /// The most recent `n` points, oldest first. Shorter if the series is.
    pub fn latest(&self, n: usize) -> &[BenchmarkPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    pub fn content_hash(&self) -> &SeriesHash {
        &self.hash
    }
}

impl Default for BenchmarkSeries {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for BenchmarkSeries {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

//! Benchmark store: the process-wide snapshot behind an atomic swap.
//!
//! Readers clone the current `Arc<BenchmarkSeries>` and then work on it
//! without holding any lock. A reload builds the replacement off to the side
//! and publishes it with a single pointer swap, so a reader sees either the
//! old snapshot or the new one, never a partial series.
//!
//! The convenience queries each take their own snapshot. Callers that need
//! several answers from the same snapshot should call [`BenchmarkStore::snapshot`]
//! once and query the series directly.

use super::loader::{BenchmarkLoader, LoadError};
use crate::domain::{BenchmarkPoint, BenchmarkSeries, SeriesHash};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Per-request query errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no benchmark data for {0}")]
    DateNotFound(NaiveDate),

    #[error("position {position} out of range (benchmark has {len} points)")]
    OutOfRange { position: usize, len: usize },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// What a reload replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub previous_hash: SeriesHash,
    pub current_hash: SeriesHash,
    pub previous_len: usize,
    pub current_len: usize,
}

impl ReloadOutcome {
    /// True if the new snapshot differs in content from the old one.
    pub fn changed(&self) -> bool {
        self.previous_hash != self.current_hash
    }
}

/// Holder of the current benchmark snapshot.
#[derive(Debug)]
pub struct BenchmarkStore {
    current: RwLock<Arc<BenchmarkSeries>>,
}

impl BenchmarkStore {
    pub fn new(series: BenchmarkSeries) -> Self {
        Self {
            current: RwLock::new(Arc::new(series)),
        }
    }

    /// The current snapshot. Cheap: one refcount increment.
    pub fn snapshot(&self) -> Arc<BenchmarkSeries> {
        // The guarded value is a single Arc, replaced whole; a poisoned lock
        // still holds a complete snapshot.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Position of `date` in the ascending timeline.
    pub fn lookup_by_date(&self, date: NaiveDate) -> Result<usize, StoreError> {
        self.snapshot()
            .position_of(date)
            .ok_or(StoreError::DateNotFound(date))
    }

    /// Index value at a zero-based position.
    pub fn value_at_position(&self, position: usize) -> Result<f32, StoreError> {
        let series = self.snapshot();
        series.value_at(position).ok_or(StoreError::OutOfRange {
            position,
            len: series.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// The last `n` points, oldest first; fewer if the benchmark is shorter.
    pub fn latest(&self, n: usize) -> Vec<BenchmarkPoint> {
        self.snapshot().latest(n).to_vec()
    }

    /// Every index value, oldest first.
    pub fn values(&self) -> Vec<f32> {
        self.snapshot().values()
    }

    /// Points between two trading dates, both inclusive.
    pub fn range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BenchmarkPoint>, StoreError> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        let series = self.snapshot();
        let from = series
            .position_of(start)
            .ok_or(StoreError::DateNotFound(start))?;
        let to = series
            .position_of(end)
            .ok_or(StoreError::DateNotFound(end))?;
        Ok(series.points()[from..=to].to_vec())
    }

    /// Publish a new snapshot, returning the one it replaced.
    pub fn replace(&self, series: BenchmarkSeries) -> Arc<BenchmarkSeries> {
        let next = Arc::new(series);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Build a snapshot from `reader` and swap it in.
    ///
    /// On error the current snapshot is left untouched.
    pub fn reload<R: Read>(
        &self,
        loader: &BenchmarkLoader,
        reader: R,
    ) -> Result<ReloadOutcome, LoadError> {
        let series = loader.load_reader(reader)?;
        Ok(self.publish(series))
    }

    /// Build a snapshot from a file and swap it in.
    pub fn reload_from_path(
        &self,
        loader: &BenchmarkLoader,
        path: &Path,
    ) -> Result<ReloadOutcome, LoadError> {
        let series = loader.load_path(path)?;
        Ok(self.publish(series))
    }

    fn publish(&self, series: BenchmarkSeries) -> ReloadOutcome {
        let current_hash = series.content_hash().clone();
        let current_len = series.len();
        let previous = self.replace(series);
        ReloadOutcome {
            previous_hash: previous.content_hash().clone(),
            current_hash,
            previous_len: previous.len(),
            current_len,
        }
    }
}

impl Default for BenchmarkStore {
    fn default() -> Self {
        Self::new(BenchmarkSeries::empty())
    }
}

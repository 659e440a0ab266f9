//! QuantLab Core: benchmark timeline, series alignment, chart composition.
//!
//! This crate contains the in-memory comparison engine:
//! - Loader: newest-first benchmark CSV → ascending, date-indexed series
//! - Store: immutable snapshot with atomic swap-on-reload
//! - Aligner: strategy return series → benchmark timeline (right or dated anchor)
//! - Composer: aligned pair → absolute or rebased chart arrays

pub mod align;
pub mod chart;
pub mod data;
pub mod domain;

pub use align::{align_series, AlignError, AlignedComparison, AlignmentMeta, AnchorPolicy};
pub use chart::{compose, ChartMode, ChartPayload, ComposeError, SeriesKind};
pub use data::{
    BenchmarkLoader, BenchmarkStore, LoadError, LoaderOptions, ReloadOutcome, StoreError,
};
pub use domain::{BenchmarkPoint, BenchmarkSeries, DateSpan, SeriesHash, StrategyReturnSeries};

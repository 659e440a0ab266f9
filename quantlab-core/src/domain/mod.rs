//! Domain types for the benchmark timeline and strategy return series.

pub mod point;
pub mod series;
pub mod strategy;

pub use point::BenchmarkPoint;
pub use series::{BenchmarkSeries, SeriesError, SeriesHash};
pub use strategy::{DateSpan, StrategyReturnSeries};

//! Benchmark ingestion and the shared snapshot store.

pub mod loader;
pub mod store;

pub use loader::{parse_trading_date, BenchmarkLoader, LoadError, LoaderOptions, TIMESTAMP_FORMAT};
pub use store::{BenchmarkStore, ReloadOutcome, StoreError};

//! BenchmarkService: load once, read everywhere, reload on demand.
//!
//! Four entry points for quant lifecycle code:
//! - `load_benchmark()`: startup; any source error is returned and the caller
//!   must not serve traffic.
//! - `benchmark_window()` / `full_benchmark()`: raw benchmark chart views.
//! - `align_series()`: place a strategy series on the benchmark timeline.
//! - `compose()` / `quant_chart()`: shape the comparison for the response.
//!
//! The service is `Send + Sync`; share it behind an `Arc`.

use chrono::NaiveDate;
use serde::Serialize;

use quantlab_core::{
    align_series, compose, AlignedComparison, AnchorPolicy, BenchmarkLoader, BenchmarkPoint,
    BenchmarkSeries, BenchmarkStore, ChartMode, ChartPayload, ReloadOutcome,
    StrategyReturnSeries,
};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Chart data for one quant model, as handed to the response layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantChart {
    pub quant_id: u64,
    pub benchmark_name: String,
    #[serde(flatten)]
    pub payload: ChartPayload,
}

#[derive(Debug)]
pub struct BenchmarkService {
    config: ServiceConfig,
    loader: BenchmarkLoader,
    store: BenchmarkStore,
}

impl BenchmarkService {
    /// Validate `config` and load the benchmark source.
    ///
    /// This is the startup path: an `Err` here means the benchmark is missing
    /// or corrupt and the process must not start serving.
    pub fn load_benchmark(config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let loader = BenchmarkLoader::new(config.loader_options());
        let path = config.benchmark.path.clone();

        let series = loader.load_path(&path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "benchmark load failed");
            e
        })?;

        tracing::info!(
            benchmark = %config.benchmark.name,
            path = %path.display(),
            points = series.len(),
            first = ?series.first().map(|p| p.trading_date),
            last = ?series.last().map(|p| p.trading_date),
            hash = %series.content_hash(),
            "benchmark loaded"
        );

        Ok(Self::from_series(config, series))
    }

    /// Wrap an already-built series. Does not touch the filesystem.
    pub fn from_series(config: ServiceConfig, series: BenchmarkSeries) -> Self {
        let loader = BenchmarkLoader::new(config.loader_options());
        Self {
            config,
            loader,
            store: BenchmarkStore::new(series),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &BenchmarkStore {
        &self.store
    }

    /// Re-read the configured source and swap it in.
    ///
    /// On failure the current snapshot keeps serving and the error is returned.
    pub fn reload(&self) -> Result<ReloadOutcome, ServiceError> {
        let path = &self.config.benchmark.path;
        match self.store.reload_from_path(&self.loader, path) {
            Ok(outcome) => {
                tracing::info!(
                    benchmark = %self.config.benchmark.name,
                    previous_points = outcome.previous_len,
                    points = outcome.current_len,
                    changed = outcome.changed(),
                    hash = %outcome.current_hash,
                    "benchmark reloaded"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "benchmark reload failed; keeping previous snapshot"
                );
                Err(e.into())
            }
        }
    }

    /// The most recent `n` index values (configured default when `None`).
    pub fn benchmark_window(&self, n: Option<usize>) -> Vec<f32> {
        let n = n.unwrap_or(self.config.chart.default_window);
        self.store
            .latest(n)
            .into_iter()
            .map(|p| p.index_value)
            .collect()
    }

    /// Every index value, oldest first.
    pub fn full_benchmark(&self) -> Vec<f32> {
        self.store.values()
    }

    /// Benchmark points between two trading dates, inclusive.
    pub fn benchmark_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BenchmarkPoint>, ServiceError> {
        Ok(self.store.range(start, end)?)
    }

    /// Align a strategy series; `None` uses the configured anchor policy.
    pub fn align_series(
        &self,
        series: &StrategyReturnSeries,
        policy: Option<AnchorPolicy>,
    ) -> Result<AlignedComparison, ServiceError> {
        let policy = policy.unwrap_or(self.config.chart.default_anchor);
        let snapshot = self.store.snapshot();
        let aligned = align_series(&snapshot, series, policy)?;

        if aligned.meta.truncated_points > 0 {
            tracing::warn!(
                strategy_points = series.len(),
                benchmark_points = snapshot.len(),
                truncated = aligned.meta.truncated_points,
                ?policy,
                "strategy series truncated to benchmark window"
            );
        }
        tracing::debug!(
            points = aligned.len(),
            start = ?aligned.meta.aligned_start_date,
            end = ?aligned.meta.aligned_end_date,
            "aligned strategy series"
        );

        Ok(aligned)
    }

    /// Compose chart arrays; `None` uses the configured mode.
    pub fn compose(
        &self,
        comparison: AlignedComparison,
        mode: Option<ChartMode>,
    ) -> Result<ChartPayload, ServiceError> {
        let mode = mode.unwrap_or(self.config.chart.default_mode);
        Ok(compose(comparison, mode)?)
    }

    /// Align and compose in one step, tagged with the quant id.
    pub fn quant_chart(
        &self,
        quant_id: u64,
        series: &StrategyReturnSeries,
        policy: Option<AnchorPolicy>,
        mode: Option<ChartMode>,
    ) -> Result<QuantChart, ServiceError> {
        let aligned = self.align_series(series, policy)?;
        let payload = self.compose(aligned, mode).map_err(|e| {
            tracing::debug!(quant_id, error = %e, "quant chart composition rejected");
            e
        })?;
        Ok(QuantChart {
            quant_id,
            benchmark_name: self.config.benchmark.name.clone(),
            payload,
        })
    }
}

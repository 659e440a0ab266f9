//! Property tests for the benchmark timeline and comparison engine.
//!
//! Uses proptest to verify:
//! 1. Loading yields a strictly ascending series with one point per row
//! 2. Date lookup and positional access agree for every point
//! 3. Reloading the same source is idempotent
//! 4. Right-anchored alignment always ends on the benchmark's last day
//! 5. Over-long strategies report exactly the dropped count
//! 6. Relative composition is invariant under positive scaling

use chrono::NaiveDate;
use proptest::prelude::*;
use quantlab_core::{
    align_series, compose, AnchorPolicy, BenchmarkLoader, BenchmarkSeries, BenchmarkStore,
    ChartMode, StrategyReturnSeries,
};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Newest-first CSV text over `len` distinct days with random gaps.
fn arb_source() -> impl Strategy<Value = (String, usize)> {
    prop::collection::vec((1i64..5, 100.0f32..5000.0), 0..60).prop_map(|rows| {
        let mut day = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
        let mut lines = Vec::with_capacity(rows.len());
        for (gap, value) in &rows {
            day += chrono::Duration::days(*gap);
            lines.push(format!("{}T00:00:00.000Z,{value}", day.format("%Y-%m-%d")));
        }
        lines.reverse();
        (lines.join("\n"), rows.len())
    })
}

fn load(source: &str) -> BenchmarkSeries {
    BenchmarkLoader::default()
        .load_reader(source.as_bytes())
        .unwrap()
}

fn arb_values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, 0..max_len)
}

// ── 1–3. Loading ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn load_is_ascending_and_complete((source, rows) in arb_source()) {
        let series = load(&source);
        prop_assert_eq!(series.len(), rows);
        for pair in series.points().windows(2) {
            prop_assert!(pair[0].trading_date < pair[1].trading_date);
        }
    }

    #[test]
    fn lookup_matches_position((source, _) in arb_source()) {
        let series = load(&source);
        for (position, point) in series.points().iter().enumerate() {
            prop_assert_eq!(series.position_of(point.trading_date), Some(position));
            prop_assert_eq!(series.value_at(position), Some(point.index_value));
        }
    }

    #[test]
    fn reload_same_source_is_idempotent((source, _) in arb_source()) {
        let store = BenchmarkStore::new(load(&source));
        let before = store.snapshot();
        let outcome = store.reload(&BenchmarkLoader::default(), source.as_bytes()).unwrap();
        let after = store.snapshot();
        prop_assert!(!outcome.changed());
        prop_assert_eq!(&*after, &*before);
    }
}

// ── 4–5. Alignment ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn right_anchor_ends_on_last_benchmark_day(
        (source, _) in arb_source(),
        values in arb_values(80),
    ) {
        let series = load(&source);
        let strategy = StrategyReturnSeries::new(values.clone());
        let aligned = align_series(&series, &strategy, AnchorPolicy::Right).unwrap();

        prop_assert_eq!(aligned.dates.len(), aligned.benchmark.len());
        prop_assert_eq!(aligned.strategy.len(), aligned.benchmark.len());

        if !aligned.is_empty() {
            prop_assert_eq!(
                aligned.meta.aligned_end_date,
                series.last().map(|p| p.trading_date)
            );
            prop_assert_eq!(aligned.strategy.last(), values.last());
        }
    }

    #[test]
    fn truncation_count_is_exact(
        (source, _) in arb_source(),
        values in arb_values(80),
    ) {
        let series = load(&source);
        let strategy = StrategyReturnSeries::new(values.clone());
        let aligned = align_series(&series, &strategy, AnchorPolicy::Right).unwrap();

        if values.len() > series.len() {
            prop_assert_eq!(aligned.meta.truncated_points, values.len() - series.len());
            prop_assert_eq!(aligned.len(), series.len());
        } else {
            prop_assert_eq!(aligned.meta.truncated_points, 0);
            prop_assert_eq!(aligned.len(), values.len());
        }
    }
}

// ── 6. Composition ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn relative_is_scale_invariant(
        values in prop::collection::vec(1.0..1000.0_f64, 1..30),
        scale in 0.01..100.0_f64,
    ) {
        let series = load(
            "2024-01-05T00:00:00.000Z,103\n\
             2024-01-04T00:00:00.000Z,105\n\
             2024-01-03T00:00:00.000Z,102\n\
             2024-01-02T00:00:00.000Z,100",
        );
        let scaled: Vec<f64> = values.iter().map(|v| v * scale).collect();

        let right = |values: Vec<f64>| {
            align_series(&series, &StrategyReturnSeries::new(values), AnchorPolicy::Right).unwrap()
        };

        let a = compose(right(values), ChartMode::Relative).unwrap();
        let b = compose(right(scaled), ChartMode::Relative).unwrap();

        for (x, y) in a.strategy.iter().zip(&b.strategy) {
            prop_assert!((x - y).abs() <= 1e-9 * x.abs().max(1.0), "{} vs {}", x, y);
        }
    }
}

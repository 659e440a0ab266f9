//! QuantLab Service: the in-process benchmark interface for quant lifecycle code.
//!
//! This crate builds on `quantlab-core` to provide:
//! - TOML configuration with chart and logging defaults
//! - Startup load (fatal on a bad source) and admin reload (keeps old snapshot)
//! - Benchmark windows, strategy alignment and chart composition
//! - Quant chart payloads ready for the response layer
//! - Error classification for the request boundary

pub mod config;
pub mod error;
pub mod service;

pub use config::{BenchmarkConfig, ChartConfig, ConfigError, LoggingConfig, ServiceConfig};
pub use error::ServiceError;
pub use service::{BenchmarkService, QuantChart};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn benchmark_service_is_send_sync() {
        assert_send::<BenchmarkService>();
        assert_sync::<BenchmarkService>();
    }

    #[test]
    fn quant_chart_is_send_sync() {
        assert_send::<QuantChart>();
        assert_sync::<QuantChart>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ServiceConfig>();
        assert_sync::<ServiceConfig>();
    }

    #[test]
    fn service_error_is_send_sync() {
        assert_send::<ServiceError>();
        assert_sync::<ServiceError>();
    }
}

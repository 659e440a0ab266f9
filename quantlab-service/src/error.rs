//! Service-level errors and their request-boundary classification.

use crate::config::ConfigError;
use quantlab_core::{AlignError, ComposeError, LoadError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("benchmark load failed: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

impl ServiceError {
    /// True for errors caused by the request itself (bad dates, bad
    /// baseline), which the request layer should report to the client.
    /// False for server-side failures (config, benchmark source).
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Config(_) | ServiceError::Load(_) => false,
            ServiceError::Store(_) | ServiceError::Align(_) | ServiceError::Compose(_) => true,
        }
    }

    /// True if a requested date has no benchmark data.
    pub fn is_date_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::Store(StoreError::DateNotFound(_))
                | ServiceError::Align(AlignError::DateNotFound(_))
        )
    }
}

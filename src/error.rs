// Pillbox — Top-level error types
//
// Aggregates store failures, caller-side deadlines and configuration
// problems into a single error enum for the application boundary.

use std::time::Duration;

use thiserror::Error;

use crate::store::StoreError;

/// Top-level error type for all Pillbox operations.
#[derive(Debug, Error)]
pub enum PillboxError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{operation}: deadline of {timeout:?} exceeded")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PillboxError {
    /// True when the failure means "no such credential" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Store(e) | Self::Operation { source: e, .. } => e.is_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PillboxError>;

// Pillbox — Store error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    #[error("Transaction failed while trying to {context}: {source}")]
    Transaction {
        context: &'static str,
        #[source]
        source: redb::Error,
    },

    #[error("Sequence for bucket '{0}' is exhausted")]
    SequenceExhausted(String),

    #[error("Credential not found: {0}")]
    NotFound(u64),

    #[error("Failed to encode credential: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode credential stored under key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Wrap any redb failure with the step that produced it.
    pub(crate) fn transaction(context: &'static str, err: impl Into<redb::Error>) -> Self {
        Self::Transaction {
            context,
            source: err.into(),
        }
    }

    /// True when the requested record (or its bucket) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguished_from_transaction_failure() {
        assert!(StoreError::NotFound(7).is_not_found());

        let err = StoreError::transaction(
            "begin read transaction",
            redb::StorageError::Corrupted("bad page".to_string()),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("begin read transaction"));
    }
}

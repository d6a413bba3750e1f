// Pillbox — Embedded Database Management
//
// Opens the redb file that backs the credential store. The handle is opened
// once per process and shared by cloning; redb itself serializes writers
// and gives every reader a point-in-time snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

use super::StoreError;

/// Per-bucket monotonic counters: bucket name -> last issued value.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("__sequences");

/// Shared handle to the embedded store.
#[derive(Clone)]
pub struct Database {
    inner: Arc<redb::Database>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the store file at the given path.
    /// The parent directory is created if missing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = redb::Database::create(path).map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        // Owner-only access, the file holds payment proofs
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "Store opened");

        Ok(Self {
            inner: Arc::new(db),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = redb::Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|source| StoreError::Unavailable {
                path: PathBuf::from(":memory:"),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(db),
            path: None,
        })
    }

    /// Location of the backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Start a snapshot read.
    pub fn begin_read(&self) -> Result<ReadTransaction, StoreError> {
        self.inner
            .begin_read()
            .map_err(|e| StoreError::transaction("begin read transaction", e))
    }

    /// Start a write. Blocks while another write transaction is in flight.
    /// Dropping the returned transaction without committing aborts it.
    pub fn begin_write(&self) -> Result<WriteTransaction, StoreError> {
        self.inner
            .begin_write()
            .map_err(|e| StoreError::transaction("begin write transaction", e))
    }
}

/// Advance the counter for `bucket` inside `txn` and return the new value.
/// The first value issued for a bucket is 1.
pub(crate) fn next_sequence(txn: &WriteTransaction, bucket: &str) -> Result<u64, StoreError> {
    let mut table = txn
        .open_table(SEQUENCES)
        .map_err(|e| StoreError::transaction("open sequence table", e))?;

    let current = table
        .get(bucket)
        .map_err(|e| StoreError::transaction("read sequence", e))?
        .map(|guard| guard.value())
        .unwrap_or(0);

    let next = current
        .checked_add(1)
        .ok_or_else(|| StoreError::SequenceExhausted(bucket.to_string()))?;

    table
        .insert(bucket, next)
        .map_err(|e| StoreError::transaction("advance sequence", e))?;

    Ok(next)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

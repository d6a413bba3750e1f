// Pillbox — Application facade
//
// The caller-facing surface: add, get and list, each bounded by a deadline.
// Store calls are blocking, so they run on tokio's blocking pool. When the
// deadline passes the caller stops waiting, but the blocking task is left to
// finish and a write may still commit.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{PillboxError, Result};
use crate::store::{Credential, CredentialStore, NewCredential, StoreError};

/// Deadline applied to every store operation unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct App<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for App<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S> App<S>
where
    S: CredentialStore + Send + Sync + 'static,
{
    pub fn new(store: S, timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn add_credential(&self, credential: NewCredential) -> Result<Credential> {
        self.run("add credential", move |store| store.add(credential))
            .await
    }

    pub async fn get_credential(&self, id: u64) -> Result<Credential> {
        self.run("get credential", move |store| store.get(id)).await
    }

    pub async fn list_credentials(&self) -> Result<Vec<Credential>> {
        self.run("list credentials", |store| store.list()).await
    }

    /// Crate version, shown by the host.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> std::result::Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || f(store.as_ref()));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(source))) => {
                tracing::debug!(operation, error = %source, "Store operation failed");
                Err(PillboxError::Operation { operation, source })
            }
            Ok(Err(join_err)) => Err(PillboxError::Internal(format!(
                "{} task failed: {}",
                operation, join_err
            ))),
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Deadline exceeded waiting on store"
                );
                Err(PillboxError::DeadlineExceeded {
                    operation,
                    timeout: self.timeout,
                })
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Database, RedbCredentialStore};
    use std::collections::HashSet;

    fn setup_app() -> App<RedbCredentialStore> {
        let store = RedbCredentialStore::new(Database::open_in_memory().unwrap());
        App::new(store, DEFAULT_TIMEOUT)
    }

    fn sample_new(label: &str) -> NewCredential {
        NewCredential {
            label: label.to_string(),
            location: "https://x/y".to_string(),
            method: "GET".to_string(),
            macaroon: "ab12".to_string(),
            preimage: "cd34".to_string(),
            invoice: "lnbc1...".to_string(),
            kind: "file".to_string(),
        }
    }

    /// Wraps a real store and sleeps before every call.
    struct SlowStore {
        inner: RedbCredentialStore,
        delay: std::time::Duration,
    }

    impl CredentialStore for SlowStore {
        fn add(&self, credential: NewCredential) -> std::result::Result<Credential, StoreError> {
            std::thread::sleep(self.delay);
            self.inner.add(credential)
        }

        fn get(&self, id: u64) -> std::result::Result<Credential, StoreError> {
            std::thread::sleep(self.delay);
            self.inner.get(id)
        }

        fn list(&self) -> std::result::Result<Vec<Credential>, StoreError> {
            std::thread::sleep(self.delay);
            self.inner.list()
        }
    }

    #[tokio::test]
    async fn test_add_then_get_and_list() {
        let app = setup_app();

        let added = app.add_credential(sample_new("API")).await.unwrap();
        assert_eq!(added.id, 1);

        let fetched = app.get_credential(1).await.unwrap();
        assert_eq!(fetched, added);

        let all = app.list_credentials().await.unwrap();
        assert_eq!(all, vec![added]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let app = setup_app();

        let err = app.get_credential(7).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            PillboxError::Operation { operation: "get credential", .. }
        ));
    }

    #[tokio::test]
    async fn test_list_on_fresh_store_is_empty() {
        let app = setup_app();
        assert!(app.list_credentials().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fifty_concurrent_adds() {
        let app = setup_app();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move { app.add_credential(sample_new(&format!("c{}", i))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let cred = handle.await.unwrap().unwrap();
            assert!(ids.insert(cred.id), "Duplicate ID {}", cred.id);
        }

        let expected: HashSet<u64> = (1..=50).collect();
        assert_eq!(ids, expected, "IDs must be exactly 1..=50 with no gaps");

        let listed = app.list_credentials().await.unwrap();
        assert_eq!(listed.len(), 50);
        let listed_ids: Vec<u64> = listed.iter().map(|c| c.id).collect();
        assert_eq!(listed_ids, (1..=50).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_slow_store_trips_deadline_but_write_still_commits() {
        let db = Database::open_in_memory().unwrap();
        let slow = SlowStore {
            inner: RedbCredentialStore::new(db.clone()),
            delay: Duration::from_millis(300),
        };
        let app = App::new(slow, Duration::from_millis(20));

        let err = app.add_credential(sample_new("late")).await.unwrap_err();
        assert!(matches!(
            err,
            PillboxError::DeadlineExceeded { operation: "add credential", .. }
        ));

        // The abandoned task keeps running and commits
        tokio::time::sleep(Duration::from_millis(800)).await;
        let direct = RedbCredentialStore::new(db);
        let stored = direct.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].label, "late");
    }

    #[tokio::test]
    async fn test_version_matches_crate() {
        let app = setup_app();
        assert_eq!(app.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(app.timeout(), DEFAULT_TIMEOUT);
    }
}

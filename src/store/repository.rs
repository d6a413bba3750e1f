// Pillbox — Credential Store Repository
//
// Add / get / list over the `credentials` bucket. Every operation runs in
// exactly one redb transaction: writes commit or abort as a whole, reads see
// a single snapshot. No locking happens here beyond what redb provides.

use chrono::Utc;
use redb::{ReadableTable, TableDefinition, TableError};

use super::db::{next_sequence, Database};
use super::models::{Credential, NewCredential};
use super::StoreError;

/// Name of the bucket holding credential records.
pub const CREDENTIALS_BUCKET: &str = "credentials";

/// Key: decimal ID without padding. Value: JSON-encoded `Credential`.
const CREDENTIALS: TableDefinition<&str, &[u8]> = TableDefinition::new(CREDENTIALS_BUCKET);

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over credential storage operations.
pub trait CredentialStore {
    /// Persist a new credential. The store assigns the ID and creation time
    /// and returns the full record as written.
    fn add(&self, credential: NewCredential) -> Result<Credential, StoreError>;

    /// Get a credential by ID. Fails with `StoreError::NotFound` if it does
    /// not exist.
    fn get(&self, id: u64) -> Result<Credential, StoreError>;

    /// List all credentials in ascending ID order. An empty store yields an
    /// empty list.
    fn list(&self) -> Result<Vec<Credential>, StoreError>;
}

// ─── redb Implementation ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedbCredentialStore {
    db: Database,
}

impl RedbCredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn key(id: u64) -> String {
        id.to_string()
    }
}

impl CredentialStore for RedbCredentialStore {
    fn add(&self, new: NewCredential) -> Result<Credential, StoreError> {
        let txn = self.db.begin_write()?;

        let id = next_sequence(&txn, CREDENTIALS_BUCKET)?;
        let credential = Credential::from_new(id, Utc::now(), new);
        let value = credential.encode()?;
        let key = Self::key(id);

        {
            // Creates the bucket on first use
            let mut table = txn
                .open_table(CREDENTIALS)
                .map_err(|e| StoreError::transaction("open credentials bucket", e))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(|e| StoreError::transaction("write credential", e))?;
        }

        txn.commit()
            .map_err(|e| StoreError::transaction("commit credential", e))?;

        if !credential.has_known_method() {
            tracing::warn!(credential_id = %id, method = %credential.method, "Unrecognized request method");
        }
        if !credential.has_known_kind() {
            tracing::warn!(credential_id = %id, kind = %credential.kind, "Unrecognized credential type");
        }

        tracing::info!(
            credential_id = %id,
            label = %credential.label,
            location = %credential.location,
            "Credential stored successfully"
        );

        Ok(credential)
    }

    fn get(&self, id: u64) -> Result<Credential, StoreError> {
        let txn = self.db.begin_read()?;

        let table = match txn.open_table(CREDENTIALS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(StoreError::transaction("open credentials bucket", e)),
        };

        let key = Self::key(id);
        let value = table
            .get(key.as_str())
            .map_err(|e| StoreError::transaction("read credential", e))?
            .ok_or(StoreError::NotFound(id))?;

        Credential::decode(&key, value.value())
    }

    fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let txn = self.db.begin_read()?;

        let table = match txn.open_table(CREDENTIALS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::transaction("open credentials bucket", e)),
        };

        let entries = table
            .iter()
            .map_err(|e| StoreError::transaction("iterate credentials", e))?;

        let mut credentials = Vec::new();
        for entry in entries {
            let (key, value) = entry.map_err(|e| StoreError::transaction("read credential", e))?;
            credentials.push(Credential::decode(key.value(), value.value())?);
        }

        // Keys are unpadded decimals, so "10" sorts before "9" in the table
        credentials.sort_by_key(|c| c.id);

        Ok(credentials)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// Pillbox — Store Module
//
// Credential persistence on top of the redb embedded store. One bucket,
// `credentials`, keyed by decimal ID; IDs come from a per-bucket sequence
// advanced in the same write transaction as the record.

mod db;
mod error;
mod models;
mod repository;

pub use db::Database;
pub use error::StoreError;
pub use models::{Credential, NewCredential, KNOWN_KINDS, KNOWN_METHODS};
pub use repository::{CredentialStore, RedbCredentialStore, CREDENTIALS_BUCKET};

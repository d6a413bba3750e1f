// Pillbox — Credential data models
//
// SECURITY: the payment preimage is proof of payment and works as a bearer
// secret together with the macaroon. It is never included in Debug output
// or log messages.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// HTTP methods a credential is expected to be used with. Advisory only.
pub const KNOWN_METHODS: [&str; 4] = ["POST", "GET", "PUT", "DELETE"];

/// Resource kinds a credential is expected to unlock. Advisory only.
pub const KNOWN_KINDS: [&str; 2] = ["file", "graphql"];

/// An L402 credential as persisted in the `credentials` bucket.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: u64,
    pub label: String,
    /// URL of the resource this credential unlocks.
    pub location: String,
    // Records written before `method` and `type` existed decode as empty strings.
    #[serde(default)]
    pub method: String,
    /// Hex-encoded macaroon.
    pub macaroon: String,
    /// Hex-encoded payment preimage.
    pub preimage: String,
    /// Lightning payment request.
    pub invoice: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Credential {
    /// Assemble the persisted record from creation input plus the
    /// server-assigned fields.
    pub(crate) fn from_new(id: u64, created_at: DateTime<Utc>, new: NewCredential) -> Self {
        Self {
            id,
            label: new.label,
            location: new.location,
            method: new.method,
            macaroon: new.macaroon,
            preimage: new.preimage,
            invoice: new.invoice,
            created_at,
            kind: new.kind,
        }
    }

    /// Serialize to the stored JSON representation.
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(self).map_err(StoreError::Encode)
    }

    /// Deserialize a stored value. `key` is only used for error context.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(bytes).map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// `<macaroon>:<preimage>`, the token presented to the resource server.
    pub fn token(&self) -> String {
        format!("{}:{}", self.macaroon, self.preimage)
    }

    /// Value for the HTTP `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("L402 {}", self.token())
    }

    pub fn has_known_method(&self) -> bool {
        KNOWN_METHODS.contains(&self.method.as_str())
    }

    pub fn has_known_kind(&self) -> bool {
        KNOWN_KINDS.contains(&self.kind.as_str())
    }
}

/// Custom Debug implementation that never reveals the preimage.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("location", &self.location)
            .field("method", &self.method)
            .field("macaroon", &self.macaroon)
            .field("preimage", &"[REDACTED]")
            .field("invoice", &self.invoice)
            .field("created_at", &self.created_at)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} {})",
            self.id, self.label, self.method, self.location
        )
    }
}

/// Input struct for creating a new credential.
/// The ID and creation time are always assigned by the store.
#[derive(Clone, Default)]
pub struct NewCredential {
    pub label: String,
    pub location: String,
    pub method: String,
    pub macaroon: String,
    pub preimage: String,
    pub invoice: String,
    pub kind: String,
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("label", &self.label)
            .field("location", &self.location)
            .field("method", &self.method)
            .field("macaroon", &self.macaroon)
            .field("preimage", &"[REDACTED]")
            .field("invoice", &self.invoice)
            .field("kind", &self.kind)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

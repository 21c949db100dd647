//! Repository layer: domain models over the SeaORM adapters.
//!
//! Functions are generic over `ConnectionTrait` so they run on the pooled
//! connection and inside `with_txn` alike. JSON text columns are decoded
//! here; anything that fails to parse surfaces as data corruption.

pub mod games;
pub mod invitations;
pub mod liveness;
pub mod messages;
pub mod participants;
pub mod pending_actions;
pub mod profiles;
pub mod table_chat;
pub mod users;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::domain::DomainError;

pub(crate) fn decode_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, DomainError> {
    serde_json::from_str(raw).map_err(|e| DomainError::corrupt(format!("{what}: {e}")))
}

pub(crate) fn encode_json<T: Serialize>(value: &T, what: &str) -> Result<String, DomainError> {
    serde_json::to_string(value)
        .map_err(|e| DomainError::corrupt(format!("{what} failed to encode: {e}")))
}

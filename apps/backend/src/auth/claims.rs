//! Backend-specific JWT claims used across the application.

use serde::{Deserialize, Serialize};

/// Claims inserted into request extensions by the authentication middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendClaims {
    /// Internal user id
    pub user_id: i64,
    pub username: String,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

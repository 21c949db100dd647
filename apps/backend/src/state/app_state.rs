use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::ai::{AiClient, DisabledAi};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Narrator and media provider
    pub ai: Arc<dyn AiClient>,
}

impl AppState {
    /// Create a new AppState with the given database connection and security config
    pub fn new(db: DatabaseConnection, security: SecurityConfig, ai: Arc<dyn AiClient>) -> Self {
        Self {
            db: Some(db),
            security,
            ai,
        }
    }

    /// Create a new AppState without a database connection
    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            ai: Arc::new(DisabledAi),
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

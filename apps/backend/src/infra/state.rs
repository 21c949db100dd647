use std::sync::Arc;

use crate::ai::{AiClient, DisabledAi, OpenAiClient};
use crate::config::ai::AiConfig;
use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_kind: Option<DbKind>,
    ai: Option<Arc<dyn AiClient>>,
    ai_config: Option<AiConfig>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db_kind: None,
            ai: None,
            ai_config: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Use an already-built client (tests inject a scripted one).
    pub fn with_ai(mut self, ai: Arc<dyn AiClient>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Build an HTTP client from provider settings.
    pub fn with_ai_config(mut self, config: AiConfig) -> Self {
        self.ai_config = Some(config);
        self
    }

    fn resolve_ai(ai: Option<Arc<dyn AiClient>>, config: Option<AiConfig>) -> Result<Arc<dyn AiClient>, AppError> {
        if let Some(ai) = ai {
            return Ok(ai);
        }
        match config {
            Some(cfg) if cfg.api_key.is_some() => {
                let client = OpenAiClient::new(cfg)
                    .map_err(|e| AppError::config(format!("failed to build AI client: {e}")))?;
                Ok(Arc::new(client))
            }
            _ => Ok(Arc::new(DisabledAi)),
        }
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let ai = Self::resolve_ai(self.ai, self.ai_config)?;
        if let Some(kind) = self.db_kind {
            // single entrypoint: build + migrate
            let conn = bootstrap_db(kind).await?;
            Ok(AppState::new(conn, self.security_config, ai))
        } else {
            let mut state = AppState::new_without_db(self.security_config);
            state.ai = ai;
            Ok(state)
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

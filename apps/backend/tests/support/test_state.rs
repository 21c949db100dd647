use std::sync::Arc;

use taleforge::ai::AiClient;
use taleforge::config::db::DbKind;
use taleforge::infra::state::build_state;
use taleforge::state::app_state::AppState;
use taleforge::state::security_config::SecurityConfig;

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
}

/// Fresh in-memory SQLite database, migrated, with the given narrator.
pub async fn build_test_state(ai: Arc<dyn AiClient>) -> AppState {
    build_state()
        .with_db(DbKind::SqliteMemory)
        .with_security(test_security())
        .with_ai(ai)
        .build()
        .await
        .expect("test state should build")
}

use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::warn;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Run `f` inside a transaction on the pooled connection.
///
/// Commits on `Ok`, rolls back on `Err` and returns the closure's error.
/// Never await network calls (the AI provider) inside `f`; the connection
/// stays checked out for the whole closure.
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(
        &'c DatabaseTransaction,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<R, AppError>> + Send + 'c>,
    >,
{
    let db = require_db(state)?;
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

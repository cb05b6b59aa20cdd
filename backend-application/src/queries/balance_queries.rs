use backend_domain::Balance;

use crate::{AppError, AppState};

/// Missing rows read as zero; the write paths guarantee a row is never
/// persisted null, so no caller-side defaulting is needed.
pub async fn get_balance(state: &AppState, clerk_id: &str) -> Result<Balance, AppError> {
    Ok(state.ledger_repo.fetch_balance(clerk_id).await?)
}

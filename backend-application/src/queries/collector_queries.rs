use backend_domain::CollectorProfile;

use crate::{AppError, AppState};

pub async fn get_collector(
    state: &AppState,
    clerk_id: &str,
) -> Result<CollectorProfile, AppError> {
    state
        .collector_repo
        .fetch_collector(clerk_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collector '{}' not found", clerk_id)))
}

use backend_domain::{PickupRequest, RequestFilter, RequestStatus};

use crate::{AppError, AppState};

pub async fn get_request(state: &AppState, request_id: i64) -> Result<PickupRequest, AppError> {
    state
        .request_repo
        .fetch_request(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("request {} not found", request_id)))
}

pub async fn list_for_customer(
    state: &AppState,
    clerk_id: &str,
    filter: RequestFilter,
) -> Result<Vec<PickupRequest>, AppError> {
    let status = parse_filter(filter)?;
    Ok(state.request_repo.list_by_customer(clerk_id, status).await?)
}

pub async fn list_for_collector(
    state: &AppState,
    clerk_id: &str,
    filter: RequestFilter,
) -> Result<Vec<PickupRequest>, AppError> {
    let status = parse_filter(filter)?;
    Ok(state
        .request_repo
        .list_by_collector(clerk_id, status)
        .await?)
}

fn parse_filter(filter: RequestFilter) -> Result<Option<RequestStatus>, AppError> {
    match filter.status {
        None => Ok(None),
        Some(raw) => RequestStatus::parse(&raw)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", raw))),
    }
}

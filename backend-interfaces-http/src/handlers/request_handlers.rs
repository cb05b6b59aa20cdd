use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::request_commands;
use backend_application::queries::request_queries;
use backend_application::AppState;
use backend_domain::{PickupRequest, RequestCreate, RequestFilter, RequestStatusUpdate};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RequestCreate>,
) -> Result<(StatusCode, Json<PickupRequest>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = request_commands::create_request(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<PickupRequest>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = request_queries::get_request(&state, request_id).await?;
    Ok(Json(request))
}

pub async fn list_customer_requests(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    headers: HeaderMap,
    Query(filter): Query<RequestFilter>,
) -> Result<Json<Vec<PickupRequest>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let requests = request_queries::list_for_customer(&state, &clerk_id, filter).await?;
    Ok(Json(requests))
}

pub async fn list_collector_requests(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    headers: HeaderMap,
    Query(filter): Query<RequestFilter>,
) -> Result<Json<Vec<PickupRequest>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let requests = request_queries::list_for_collector(&state, &clerk_id, filter).await?;
    Ok(Json(requests))
}

pub async fn update_request_status(
    State(state): State<AppState>,
    Path(request_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<RequestStatusUpdate>,
) -> Result<Json<PickupRequest>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let request = request_commands::update_request_status(&state, request_id, payload).await?;
    Ok(Json(request))
}

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::collector_commands;
use backend_application::queries::collector_queries;
use backend_application::AppState;
use backend_domain::{CollectorCreate, CollectorProfile, RfidBind};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn create_collector(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CollectorCreate>,
) -> Result<(StatusCode, Json<CollectorProfile>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let collector = collector_commands::register_collector(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(collector)))
}

pub async fn get_collector(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CollectorProfile>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let collector = collector_queries::get_collector(&state, &clerk_id).await?;
    Ok(Json(collector))
}

pub async fn bind_rfid(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<RfidBind>,
) -> Result<Json<CollectorProfile>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let collector = collector_commands::bind_rfid(&state, &clerk_id, payload).await?;
    Ok(Json(collector))
}

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::commands::device_token_commands;
use backend_application::AppState;
use backend_domain::{DeviceTokenRequest, DeviceTokenResponse, NotifyDeliveryRecord};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(serde::Serialize)]
struct NotifyTargetStatus {
    status: String,
}

#[derive(serde::Deserialize)]
pub struct NotifyDeliveryQuery {
    pub limit: Option<usize>,
}

pub async fn issue_device_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DeviceTokenRequest>,
) -> Result<Json<DeviceTokenResponse>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let token = device_token_commands::issue_device_token(&state, payload).await?;
    Ok(Json(token))
}

pub async fn notify_target_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(NotifyTargetStatus {
                status: "unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    match timeout(
        Duration::from_secs(timeout_secs),
        state.notifier.check_notify_target(&state.config),
    )
    .await
    {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(NotifyTargetStatus {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Ok(Err(err)) => {
            error!("notify target check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NotifyTargetStatus {
                    status: "error".to_string(),
                }),
            )
                .into_response()
        }
        Err(_) => {
            error!("notify target check timeout after {}s", timeout_secs);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(NotifyTargetStatus {
                    status: "timeout".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn list_notify_deliveries(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NotifyDeliveryQuery>,
) -> Result<Json<Vec<NotifyDeliveryRecord>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let deliveries = state.notifier.recent_deliveries(limit).await;
    Ok(Json(deliveries))
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    match timeout(Duration::from_secs(timeout_secs), state.sensor_repo.ping()).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

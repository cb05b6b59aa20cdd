use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::sensor_commands;
use backend_application::queries::sensor_queries;
use backend_application::AppState;
use backend_domain::{
    BinEvent,
    RfidSignal,
    Sensor,
    SensorCreate,
    SensorLogQuery,
    StatusSignal,
    StatusSignalResult,
};

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_device};

pub async fn create_sensor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SensorCreate>,
) -> Result<(StatusCode, Json<Sensor>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let sensor = sensor_commands::register_sensor(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

pub async fn list_sensors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Sensor>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let sensors = sensor_queries::list_sensors(&state).await?;
    Ok(Json(sensors))
}

pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Sensor>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let sensor = sensor_queries::get_sensor(&state, &sensor_id).await?;
    Ok(Json(sensor))
}

pub async fn sensor_logs(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<SensorLogQuery>,
) -> Result<Json<Vec<BinEvent>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let events = sensor_queries::sensor_logs(&state, &sensor_id, query).await?;
    Ok(Json(events))
}

/// The `update_status` hardware signal.
pub async fn update_status(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<StatusSignal>,
) -> Result<Json<StatusSignalResult>, HttpError> {
    if !authorize_device(&state.config, &headers, &sensor_id) {
        return Err(HttpError::Unauthorized);
    }
    let result = sensor_commands::update_status(&state, &sensor_id, payload.status).await?;
    Ok(Json(result))
}

/// The `attach_rfid` hardware signal.
pub async fn attach_rfid(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<RfidSignal>,
) -> Result<Json<BinEvent>, HttpError> {
    if !authorize_device(&state.config, &headers, &sensor_id) {
        return Err(HttpError::Unauthorized);
    }
    let event = sensor_commands::attach_rfid(&state, &sensor_id, payload).await?;
    Ok(Json(event))
}

use backend_domain::{BinEvent, Sensor, SensorLogQuery};

use crate::{AppError, AppState};

pub async fn get_sensor(state: &AppState, sensor_id: &str) -> Result<Sensor, AppError> {
    state
        .sensor_repo
        .fetch_sensor(sensor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sensor '{}' not found", sensor_id)))
}

pub async fn list_sensors(state: &AppState) -> Result<Vec<Sensor>, AppError> {
    Ok(state.sensor_repo.list_sensors().await?)
}

pub async fn sensor_logs(
    state: &AppState,
    sensor_id: &str,
    query: SensorLogQuery,
) -> Result<Vec<BinEvent>, AppError> {
    if state.sensor_repo.fetch_sensor(sensor_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "sensor '{}' not found",
            sensor_id
        )));
    }
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    Ok(state.event_repo.fetch_events(sensor_id, limit).await?)
}

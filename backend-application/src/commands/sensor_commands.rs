use anyhow::anyhow;
use tracing::info;

use backend_domain::services::{plan_status_transition, TransitionError, TransitionPlan};
use backend_domain::{BinEvent, RfidSignal, Sensor, SensorCreate, StatusSignalResult};

use crate::commands::{normalize_required, settlement_commands};
use crate::{AppError, AppState};

pub async fn register_sensor(
    state: &AppState,
    payload: SensorCreate,
) -> Result<Sensor, AppError> {
    let sensor_id = normalize_required(payload.sensor_id, "sensor_id")?;
    let sensor_name = normalize_required(payload.sensor_name, "sensor_name")?;
    let location = normalize_required(payload.location, "location")?;

    if let Some(company_id) = payload.company_id {
        if state.ledger_repo.fetch_company(company_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "company {} not found",
                company_id
            )));
        }
    }

    let sensor = Sensor {
        sensor_id,
        sensor_name,
        location,
        company_id: payload.company_id,
        sensor_status: false,
    };
    if !state.sensor_repo.insert_sensor(&sensor).await? {
        return Err(AppError::Conflict(format!(
            "sensor '{}' already exists",
            sensor.sensor_id
        )));
    }
    Ok(sensor)
}

/// The `update_status` signal from sensor hardware. Holds the sensor's
/// lock across read, validation, log append/flip and settlement, so
/// concurrent signals for one sensor resolve to exactly one winner.
pub async fn update_status(
    state: &AppState,
    sensor_id: &str,
    desired: bool,
) -> Result<StatusSignalResult, AppError> {
    let _guard = state.sensor_locks.acquire(sensor_id).await;
    state.metrics.record_status_signal();

    let sensor = state
        .sensor_repo
        .fetch_sensor(sensor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sensor '{}' not found", sensor_id)))?;
    let active = state.event_repo.find_active_event(sensor_id).await?;
    let has_history = !state.event_repo.fetch_events(sensor_id, 1).await?.is_empty();

    let plan = plan_status_transition(&sensor, active.as_ref(), has_history, desired)
        .map_err(|err| {
            state.metrics.record_rejected_transition();
            match err {
                TransitionError::RfidNotScanned => AppError::PreconditionFailed(err.reason()),
                _ => AppError::Conflict(err.reason()),
            }
        })?;

    match plan {
        TransitionPlan::OpenCollection => {
            state.event_repo.append_event(sensor_id, true).await?;
            state.sensor_repo.set_sensor_status(sensor_id, true).await?;
            info!(sensor_id, "collection opened, awaiting RFID tap");
            state.notifier.spawn_send(
                state.config.clone(),
                format!(
                    "Bin '{}' at {} is full and awaiting collection.",
                    sensor.sensor_name, sensor.location
                ),
            );
            Ok(StatusSignalResult::opened(sensor.sensor_id))
        }
        TransitionPlan::CloseCollection { event_id } => {
            let Some(event) = active else {
                return Err(AppError::Internal(anyhow!(
                    "active event vanished while closing collection"
                )));
            };
            state.event_repo.close_event(event_id).await?;
            state.sensor_repo.set_sensor_status(sensor_id, false).await?;
            info!(sensor_id, "collection closed, settling");
            let outcome = settlement_commands::settle_collection(state, &sensor, &event).await?;
            Ok(StatusSignalResult::closed(sensor.sensor_id, &outcome))
        }
    }
}

/// The `attach_rfid` signal: associates a scanned tag with the sensor's
/// open event, identifying who is performing the collection. The only
/// permitted log mutation besides the close-time status flip.
pub async fn attach_rfid(
    state: &AppState,
    sensor_id: &str,
    payload: RfidSignal,
) -> Result<BinEvent, AppError> {
    let rfid = normalize_required(payload.rfid, "rfid")?;

    let _guard = state.sensor_locks.acquire(sensor_id).await;
    state.metrics.record_rfid_attach();

    if state.sensor_repo.fetch_sensor(sensor_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "sensor '{}' not found",
            sensor_id
        )));
    }
    let collector = state
        .collector_repo
        .find_by_rfid(&rfid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("RFID '{}' is not registered", rfid)))?;

    let event = match state.event_repo.find_active_event(sensor_id).await? {
        Some(event) if event.is_open() => event,
        _ => {
            return Err(AppError::NotFound(
                "no active log entry awaiting an RFID".to_string(),
            ))
        }
    };

    state.event_repo.attach_rfid(event.id, &rfid).await?;
    info!(
        sensor_id,
        clerk_id = %collector.clerk_id,
        "RFID attached to open collection"
    );
    Ok(BinEvent {
        rfid: Some(rfid),
        ..event
    })
}

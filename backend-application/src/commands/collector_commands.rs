use tracing::error;

use backend_domain::{CollectorCreate, CollectorProfile, RfidBind, UserRole};

use crate::commands::{normalize_optional, normalize_required};
use crate::{AppError, AppState};

pub async fn register_collector(
    state: &AppState,
    payload: CollectorCreate,
) -> Result<CollectorProfile, AppError> {
    let clerk_id = normalize_required(payload.clerk_id, "clerk_id")?;
    let rfid = normalize_optional(payload.rfid);

    if state.config.identity_url.is_some() {
        let role = state
            .identity
            .lookup_role(&state.config, &clerk_id)
            .await
            .map_err(|err| {
                error!("identity lookup failed: {}", err);
                AppError::Internal(err)
            })?;
        match role {
            None => {
                return Err(AppError::NotFound(format!(
                    "clerk id '{}' unknown to identity provider",
                    clerk_id
                )))
            }
            Some(UserRole::Ragpicker) => {}
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "clerk id '{}' has role {}, expected Ragpicker",
                    clerk_id,
                    other.as_str()
                )))
            }
        }
    }

    if let Some(tag) = &rfid {
        if state.collector_repo.find_by_rfid(tag).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "RFID '{}' is already bound to a collector",
                tag
            )));
        }
    }

    let collector = CollectorProfile {
        clerk_id,
        rfid,
        average_rating: 0.0,
    };
    if !state.collector_repo.insert_collector(&collector).await? {
        return Err(AppError::Conflict(format!(
            "collector '{}' is already registered",
            collector.clerk_id
        )));
    }

    // The balance row exists from day one; absence is never read as null.
    state.ledger_repo.credit(&collector.clerk_id, 0).await?;
    Ok(collector)
}

pub async fn bind_rfid(
    state: &AppState,
    clerk_id: &str,
    payload: RfidBind,
) -> Result<CollectorProfile, AppError> {
    let rfid = normalize_required(payload.rfid, "rfid")?;

    let collector = state
        .collector_repo
        .fetch_collector(clerk_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collector '{}' not found", clerk_id)))?;

    if let Some(owner) = state.collector_repo.find_by_rfid(&rfid).await? {
        if owner.clerk_id != collector.clerk_id {
            return Err(AppError::Conflict(format!(
                "RFID '{}' is already bound to a collector",
                rfid
            )));
        }
    }

    state
        .collector_repo
        .bind_rfid(&collector.clerk_id, &rfid)
        .await?;
    Ok(CollectorProfile {
        rfid: Some(rfid),
        ..collector
    })
}

use anyhow::anyhow;
use tracing::info;

use backend_domain::{
    PickupRequest,
    RequestCreate,
    RequestStatus,
    RequestStatusUpdate,
    TransferOutcome,
};

use crate::commands::normalize_required;
use crate::{AppError, AppState};

pub async fn create_request(
    state: &AppState,
    payload: RequestCreate,
) -> Result<PickupRequest, AppError> {
    let customer = normalize_required(payload.customer_clerk_id, "customer_clerk_id")?;
    let ragpicker = normalize_required(payload.ragpicker_clerk_id, "ragpicker_clerk_id")?;

    if state
        .collector_repo
        .fetch_collector(&ragpicker)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "collector '{}' not found",
            ragpicker
        )));
    }

    // Customer balance row is written at zero up front.
    state.ledger_repo.credit(&customer, 0).await?;

    let request = state
        .request_repo
        .insert_request(&customer, &ragpicker)
        .await?;
    state.notifier.spawn_send(
        state.config.clone(),
        "Your garbage collection request has been created. A ragpicker will respond soon."
            .to_string(),
    );
    Ok(request)
}

/// Accept, reject or complete a request. Completion performs the
/// peer-to-peer transfer before the status is persisted: if the
/// configured floor refuses the debit, the request stays ACCEPTED.
pub async fn update_request_status(
    state: &AppState,
    request_id: i64,
    payload: RequestStatusUpdate,
) -> Result<PickupRequest, AppError> {
    let next = RequestStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", payload.status)))?;

    let request = state
        .request_repo
        .fetch_request(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("request {} not found", request_id)))?;

    if !request.status.can_become(next) {
        return Err(AppError::Conflict(format!(
            "cannot move request {} from {} to {}",
            request_id,
            request.status.as_str(),
            next.as_str()
        )));
    }

    if next == RequestStatus::COMPLETED {
        let amount = state.config.transfer_amount;
        match state
            .ledger_repo
            .transfer(
                &request.customer_clerk_id,
                &request.ragpicker_clerk_id,
                amount,
                state.config.allow_negative_customer_balance,
            )
            .await?
        {
            TransferOutcome::Completed { to_balance, .. } => {
                info!(
                    request_id,
                    customer = %request.customer_clerk_id,
                    ragpicker = %request.ragpicker_clerk_id,
                    amount,
                    "request completed, transfer settled"
                );
                state.metrics.record_transfer_completed();
                state.notifier.spawn_send(
                    state.config.clone(),
                    format!(
                        "Your account balance has been updated. New balance: {} tokens.",
                        to_balance
                    ),
                );
            }
            TransferOutcome::InsufficientFunds { available } => {
                return Err(AppError::Conflict(format!(
                    "customer balance {} is below the transfer amount {}",
                    available, amount
                )));
            }
            TransferOutcome::MissingAccount => {
                return Err(AppError::Internal(anyhow!(
                    "party balance row missing during transfer"
                )));
            }
        }
    }

    state.request_repo.set_request_status(request_id, next).await?;

    let message = match next {
        RequestStatus::ACCEPTED => {
            Some("Good news! Your garbage collection request has been accepted.")
        }
        RequestStatus::REJECTED => Some(
            "Your garbage collection request has been rejected. Please try booking another ragpicker.",
        ),
        RequestStatus::COMPLETED => Some(
            "Your garbage collection request has been marked as completed. Thank you for using Waste Whirl!",
        ),
        RequestStatus::PENDING => None,
    };
    if let Some(message) = message {
        state
            .notifier
            .spawn_send(state.config.clone(), message.to_string());
    }

    state
        .request_repo
        .fetch_request(request_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow!("request {} vanished after update", request_id)))
}

use tracing::{info, warn};

use backend_domain::{BinEvent, Sensor, SettlementOutcome, TransferOutcome};

use crate::{AppError, AppState};

/// The settlement engine: the single place balances change because of a
/// collection event. Invoked exactly once, synchronously, at the tail of
/// a FULL -> EMPTY transition that carried a validated RFID.
///
/// Missing data and insufficient funds are terminal outcomes of the
/// sub-protocol, not errors: the bin stays empty either way, and each
/// skip is warn-logged and counted so unpaid work remains observable.
pub async fn settle_collection(
    state: &AppState,
    sensor: &Sensor,
    event: &BinEvent,
) -> Result<SettlementOutcome, AppError> {
    let amount = state.config.payout_amount;

    let Some(rfid) = event.rfid.as_deref() else {
        warn!(
            sensor_id = %sensor.sensor_id,
            "settlement skipped: closed event carries no RFID"
        );
        state.metrics.record_settlement_skipped();
        return Ok(SettlementOutcome::MissingCollector);
    };
    let Some(collector) = state.collector_repo.find_by_rfid(rfid).await? else {
        warn!(
            sensor_id = %sensor.sensor_id,
            rfid,
            "settlement skipped: RFID no longer resolves to a collector"
        );
        state.metrics.record_settlement_skipped();
        return Ok(SettlementOutcome::MissingCollector);
    };
    let Some(company_id) = sensor.company_id else {
        warn!(
            sensor_id = %sensor.sensor_id,
            "settlement skipped: sensor has no owning company"
        );
        state.metrics.record_settlement_skipped();
        return Ok(SettlementOutcome::MissingCompany);
    };

    match state
        .ledger_repo
        .payout(company_id, &collector.clerk_id, amount)
        .await?
    {
        TransferOutcome::Completed { to_balance, .. } => {
            info!(
                sensor_id = %sensor.sensor_id,
                clerk_id = %collector.clerk_id,
                amount,
                "settlement paid"
            );
            state.metrics.record_settlement_paid(amount);
            state.notifier.spawn_send(
                state.config.clone(),
                format!(
                    "Your account balance has been updated. New balance: {} tokens.",
                    to_balance
                ),
            );
            Ok(SettlementOutcome::Paid {
                amount,
                collector_balance: to_balance,
            })
        }
        TransferOutcome::InsufficientFunds { available } => {
            warn!(
                sensor_id = %sensor.sensor_id,
                company_id,
                available,
                amount,
                "settlement skipped: company balance below payout amount"
            );
            state.metrics.record_settlement_skipped();
            Ok(SettlementOutcome::SkippedInsufficientFunds { available })
        }
        TransferOutcome::MissingAccount => {
            warn!(
                sensor_id = %sensor.sensor_id,
                company_id,
                "settlement skipped: company balance row missing"
            );
            state.metrics.record_settlement_skipped();
            Ok(SettlementOutcome::MissingCompany)
        }
    }
}

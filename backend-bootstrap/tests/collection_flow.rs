// End-to-end coverage of the bin-event-to-payment state machine over the
// in-memory store: open, RFID tap, close, settle.

mod common;

use backend_application::commands::sensor_commands;
use backend_application::AppError;
use backend_domain::ports::{BinEventRepository, LedgerRepository, SensorRepository};
use backend_domain::RfidSignal;

use common::{harness, harness_failing_notifier, seed_collector, seed_company, seed_sensor};

fn rfid(tag: &str) -> RfidSignal {
    RfidSignal {
        rfid: tag.to_string(),
    }
}

#[tokio::test]
async fn scenario_a_full_cycle_pays_the_collector() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    let opened = sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    assert!(opened.sensor_status);
    let event = h
        .store
        .find_active_event("Bin1")
        .await
        .expect("query")
        .expect("open event");
    assert!(event.is_open());

    let attached = sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");
    assert_eq!(attached.rfid.as_deref(), Some("RFID-123"));

    let closed = sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect("close");
    assert!(!closed.sensor_status);
    assert_eq!(closed.settlement.as_deref(), Some("PAID"));

    // Exactly one debit and one credit of the payout amount.
    let collector_balance = h.store.fetch_balance("collector_c").await.expect("balance");
    assert_eq!(collector_balance.balance, 60);
    let company = h
        .store
        .fetch_company(company_id)
        .await
        .expect("query")
        .expect("company");
    assert_eq!(company.balance, 40);

    // The collection is resolved; no event is left active.
    assert!(h
        .store
        .find_active_event("Bin1")
        .await
        .expect("query")
        .is_none());

    let messages = h.notifier.messages();
    assert!(messages.iter().any(|m| m.contains("full and awaiting")));
    assert!(messages.iter().any(|m| m.contains("New balance: 60")));

    assert_eq!(h.state.metrics.settlements_skipped(), 0);
}

#[tokio::test]
async fn scenario_b_insufficient_funds_still_empties_the_bin() {
    let h = harness();
    let company_id = seed_company(&h.state, 40).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");
    let closed = sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect("close succeeds despite skipped payout");
    assert_eq!(
        closed.settlement.as_deref(),
        Some("SKIPPED_INSUFFICIENT_FUNDS")
    );

    // Physical state moved, financial state did not.
    let sensor = h
        .store
        .fetch_sensor("Bin1")
        .await
        .expect("query")
        .expect("sensor");
    assert!(!sensor.sensor_status);
    assert_eq!(
        h.store.fetch_balance("collector_c").await.expect("balance").balance,
        0
    );
    assert_eq!(
        h.store
            .fetch_company(company_id)
            .await
            .expect("query")
            .expect("company")
            .balance,
        40
    );
    assert_eq!(h.state.metrics.settlements_skipped(), 1);
}

#[tokio::test]
async fn scenario_c_empty_signal_without_open_collection() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;

    let err = sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect_err("reject");
    match err {
        AppError::PreconditionFailed(reason) => {
            assert!(reason.contains("RFID not scanned"));
        }
        other => panic!("expected PreconditionFailed, got {:?}", other),
    }

    let sensor = h
        .store
        .fetch_sensor("Bin1")
        .await
        .expect("query")
        .expect("sensor");
    assert!(!sensor.sensor_status);
}

#[tokio::test]
async fn redundant_signals_are_conflicts() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");

    // FULL + full signal: rejected, and no second event is stacked.
    let err = sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(h.store.fetch_events("Bin1", 10).await.expect("logs").len(), 1);

    sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");
    sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect("close");

    // EMPTY + empty signal after a completed cycle: redundant.
    let err = sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn unknown_rfid_never_mutates_the_log() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    let err = sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-UNKNOWN"))
        .await
        .expect_err("reject");
    match err {
        AppError::NotFound(reason) => assert!(reason.contains("not registered")),
        other => panic!("expected NotFound, got {:?}", other),
    }

    let event = h
        .store
        .find_active_event("Bin1")
        .await
        .expect("query")
        .expect("still open");
    assert!(event.rfid.is_none());
}

#[tokio::test]
async fn attach_requires_an_open_collection() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    let err = sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect_err("reject");
    match err {
        AppError::NotFound(reason) => assert!(reason.contains("no active log entry")),
        other => panic!("expected NotFound, got {:?}", other),
    }

    // A second tap after a successful one has nothing left to attach to.
    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");
    let err = sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn notification_failure_never_blocks_settlement() {
    let h = harness_failing_notifier();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");
    let closed = sensor_commands::update_status(&h.state, "Bin1", false)
        .await
        .expect("close");
    assert_eq!(closed.settlement.as_deref(), Some("PAID"));
    assert_eq!(
        h.store.fetch_balance("collector_c").await.expect("balance").balance,
        60
    );
}

#[tokio::test]
async fn scenario_d_concurrent_full_signals_have_one_winner() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;

    let state_a = h.state.clone();
    let state_b = h.state.clone();
    let task_a =
        tokio::spawn(async move { sensor_commands::update_status(&state_a, "Bin1", true).await });
    let task_b =
        tokio::spawn(async move { sensor_commands::update_status(&state_b, "Bin1", true).await });

    let results = [task_a.await.expect("join"), task_b.await.expect("join")];
    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }

    // Exactly one open event exists afterwards.
    assert_eq!(h.store.fetch_events("Bin1", 10).await.expect("logs").len(), 1);
    assert!(h
        .store
        .find_active_event("Bin1")
        .await
        .expect("query")
        .expect("open event")
        .is_open());
}

#[tokio::test]
async fn concurrent_empty_signals_settle_once() {
    let h = harness();
    let company_id = seed_company(&h.state, 100).await;
    seed_sensor(&h.state, "Bin1", Some(company_id)).await;
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    sensor_commands::update_status(&h.state, "Bin1", true)
        .await
        .expect("open");
    sensor_commands::attach_rfid(&h.state, "Bin1", rfid("RFID-123"))
        .await
        .expect("attach");

    let state_a = h.state.clone();
    let state_b = h.state.clone();
    let task_a =
        tokio::spawn(async move { sensor_commands::update_status(&state_a, "Bin1", false).await });
    let task_b =
        tokio::spawn(async move { sensor_commands::update_status(&state_b, "Bin1", false).await });

    let results = [task_a.await.expect("join"), task_b.await.expect("join")];
    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);

    // One payout, not two.
    assert_eq!(
        h.store.fetch_balance("collector_c").await.expect("balance").balance,
        60
    );
    assert_eq!(
        h.store
            .fetch_company(company_id)
            .await
            .expect("query")
            .expect("company")
            .balance,
        40
    );
}

#[tokio::test]
async fn unknown_sensor_is_not_found() {
    let h = harness();
    let err = sensor_commands::update_status(&h.state, "Ghost", true)
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::NotFound(_)));
}

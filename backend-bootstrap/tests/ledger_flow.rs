// Ledger-side flows: peer-to-peer transfer on request completion, the
// configurable balance floor, review aggregation and company accounts.

mod common;

use backend_application::commands::{
    collector_commands,
    company_commands,
    device_token_commands,
    request_commands,
    review_commands,
};
use backend_application::queries::{balance_queries, collector_queries};
use backend_application::AppError;
use backend_domain::ports::LedgerRepository;
use backend_domain::{
    CollectorCreate,
    CompanyTopUp,
    DeviceTokenRequest,
    RequestCreate,
    RequestStatus,
    RequestStatusUpdate,
    ReviewCreate,
    RfidBind,
};

use common::{harness, harness_custom, seed_collector, seed_sensor};

fn status(value: &str) -> RequestStatusUpdate {
    RequestStatusUpdate {
        status: value.to_string(),
    }
}

async fn accepted_request(state: &backend_application::AppState) -> i64 {
    let request = request_commands::create_request(
        state,
        RequestCreate {
            customer_clerk_id: "customer_1".to_string(),
            ragpicker_clerk_id: "collector_c".to_string(),
        },
    )
    .await
    .expect("create request");
    request_commands::update_request_status(state, request.id, status("ACCEPTED"))
        .await
        .expect("accept");
    request.id
}

#[tokio::test]
async fn request_completion_transfers_tokens() {
    let h = harness();
    seed_collector(&h.state, "collector_c", None).await;
    let request_id = accepted_request(&h.state).await;

    let request = request_commands::update_request_status(&h.state, request_id, status("COMPLETED"))
        .await
        .expect("complete");
    assert_eq!(request.status, RequestStatus::COMPLETED);
    assert!(request.updated_at.is_some());

    // No floor by default: the customer may go negative.
    assert_eq!(
        h.store.fetch_balance("customer_1").await.expect("balance").balance,
        -100
    );
    assert_eq!(
        h.store.fetch_balance("collector_c").await.expect("balance").balance,
        100
    );
}

#[tokio::test]
async fn floor_refuses_overdraft_and_leaves_the_request_accepted() {
    let h = harness_custom(|config| config.allow_negative_customer_balance = false);
    seed_collector(&h.state, "collector_c", None).await;
    h.store.credit("customer_1", 40).await.expect("fund customer");
    let request_id = accepted_request(&h.state).await;

    let err = request_commands::update_request_status(&h.state, request_id, status("COMPLETED"))
        .await
        .expect_err("reject");
    match err {
        AppError::Conflict(reason) => assert!(reason.contains("below the transfer amount")),
        other => panic!("expected Conflict, got {:?}", other),
    }

    // Neither side moved and the request can be retried after funding.
    assert_eq!(
        h.store.fetch_balance("customer_1").await.expect("balance").balance,
        40
    );
    assert_eq!(
        h.store.fetch_balance("collector_c").await.expect("balance").balance,
        0
    );
    let request = backend_application::queries::request_queries::get_request(&h.state, request_id)
        .await
        .expect("request");
    assert_eq!(request.status, RequestStatus::ACCEPTED);
}

#[tokio::test]
async fn floor_allows_completion_when_funded() {
    let h = harness_custom(|config| config.allow_negative_customer_balance = false);
    seed_collector(&h.state, "collector_c", None).await;
    h.store.credit("customer_1", 150).await.expect("fund customer");
    let request_id = accepted_request(&h.state).await;

    request_commands::update_request_status(&h.state, request_id, status("COMPLETED"))
        .await
        .expect("complete");
    assert_eq!(
        h.store.fetch_balance("customer_1").await.expect("balance").balance,
        50
    );
}

#[tokio::test]
async fn request_lifecycle_rejects_invalid_moves() {
    let h = harness();
    seed_collector(&h.state, "collector_c", None).await;
    let request = request_commands::create_request(
        &h.state,
        RequestCreate {
            customer_clerk_id: "customer_1".to_string(),
            ragpicker_clerk_id: "collector_c".to_string(),
        },
    )
    .await
    .expect("create");

    // PENDING cannot complete directly.
    let err = request_commands::update_request_status(&h.state, request.id, status("COMPLETED"))
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::Conflict(_)));

    // A rejected request is terminal.
    request_commands::update_request_status(&h.state, request.id, status("REJECTED"))
        .await
        .expect("reject request");
    let err = request_commands::update_request_status(&h.state, request.id, status("ACCEPTED"))
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = request_commands::update_request_status(&h.state, request.id, status("DONE"))
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn reviews_recompute_the_average_rating() {
    let h = harness();
    seed_collector(&h.state, "collector_c", None).await;

    for rating in [5.0, 4.0] {
        review_commands::submit_review(
            &h.state,
            ReviewCreate {
                customer_clerk_id: "customer_1".to_string(),
                ragpicker_clerk_id: "collector_c".to_string(),
                rating,
                review: "prompt and tidy".to_string(),
            },
        )
        .await
        .expect("review");
    }

    let collector = collector_queries::get_collector(&h.state, "collector_c")
        .await
        .expect("collector");
    assert_eq!(collector.average_rating, 4.5);

    let err = review_commands::submit_review(
        &h.state,
        ReviewCreate {
            customer_clerk_id: "customer_1".to_string(),
            ragpicker_clerk_id: "collector_c".to_string(),
            rating: 7.5,
            review: String::new(),
        },
    )
    .await
    .expect_err("reject");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn collector_registration_enforces_uniqueness() {
    let h = harness();
    seed_collector(&h.state, "collector_c", Some("RFID-123")).await;

    // Balance row is written at zero on registration.
    let balance = balance_queries::get_balance(&h.state, "collector_c")
        .await
        .expect("balance");
    assert_eq!(balance.balance, 0);

    let err = collector_commands::register_collector(
        &h.state,
        CollectorCreate {
            clerk_id: "collector_c".to_string(),
            rfid: None,
        },
    )
    .await
    .expect_err("duplicate clerk id");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = collector_commands::register_collector(
        &h.state,
        CollectorCreate {
            clerk_id: "collector_d".to_string(),
            rfid: Some("RFID-123".to_string()),
        },
    )
    .await
    .expect_err("duplicate rfid");
    assert!(matches!(err, AppError::Conflict(_)));

    // Rebinding a collector's own tag is fine; stealing another's is not.
    seed_collector(&h.state, "collector_d", Some("RFID-456")).await;
    collector_commands::bind_rfid(
        &h.state,
        "collector_d",
        RfidBind {
            rfid: "RFID-456".to_string(),
        },
    )
    .await
    .expect("rebind own tag");
    let err = collector_commands::bind_rfid(
        &h.state,
        "collector_d",
        RfidBind {
            rfid: "RFID-123".to_string(),
        },
    )
    .await
    .expect_err("steal tag");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn company_accounts_fund_and_read_back() {
    let h = harness();
    let company = company_commands::create_company(
        &h.state,
        backend_domain::CompanyCreate {
            company_name: "EcoWaste Ltd".to_string(),
            balance: 0,
        },
    )
    .await
    .expect("create company");

    let company = company_commands::top_up_company(
        &h.state,
        company.id,
        CompanyTopUp { amount: 500 },
    )
    .await
    .expect("top up");
    assert_eq!(company.balance, 500);

    let err = company_commands::top_up_company(&h.state, company.id, CompanyTopUp { amount: 0 })
        .await
        .expect_err("reject");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = company_commands::top_up_company(&h.state, 999, CompanyTopUp { amount: 10 })
        .await
        .expect_err("unknown company");
    assert!(matches!(err, AppError::NotFound(_)));

    // Unknown parties read as zero, never as an error.
    let balance = balance_queries::get_balance(&h.state, "nobody")
        .await
        .expect("balance");
    assert_eq!(balance.balance, 0);
}

#[tokio::test]
async fn device_tokens_are_issued_per_sensor() {
    let h = harness_custom(|config| config.device_secret = Some("test-secret".to_string()));
    seed_sensor(&h.state, "Bin1", None).await;

    let issued = device_token_commands::issue_device_token(
        &h.state,
        DeviceTokenRequest {
            sensor_id: "Bin1".to_string(),
        },
    )
    .await
    .expect("issue");
    assert!(device_token_commands::verify_device_token(
        "test-secret",
        "Bin1",
        &issued.token
    ));

    let err = device_token_commands::issue_device_token(
        &h.state,
        DeviceTokenRequest {
            sensor_id: "Ghost".to_string(),
        },
    )
    .await
    .expect_err("unknown sensor");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn device_tokens_require_a_configured_secret() {
    let h = harness();
    seed_sensor(&h.state, "Bin1", None).await;
    let err = device_token_commands::issue_device_token(
        &h.state,
        DeviceTokenRequest {
            sensor_id: "Bin1".to_string(),
        },
    )
    .await
    .expect_err("no secret");
    assert!(matches!(err, AppError::BadRequest(_)));
}

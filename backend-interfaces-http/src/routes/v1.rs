use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    collector_handlers,
    ledger_handlers,
    ops_handlers,
    request_handlers,
    review_handlers,
    sensor_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/sensors",
            axum::routing::post(sensor_handlers::create_sensor)
                .get(sensor_handlers::list_sensors),
        )
        .route(
            "/v1/sensors/:sensor_id",
            axum::routing::get(sensor_handlers::get_sensor),
        )
        .route(
            "/v1/sensors/:sensor_id/logs",
            axum::routing::get(sensor_handlers::sensor_logs),
        )
        .route(
            "/v1/sensors/:sensor_id/status",
            axum::routing::post(sensor_handlers::update_status),
        )
        .route(
            "/v1/sensors/:sensor_id/rfid",
            axum::routing::post(sensor_handlers::attach_rfid),
        )
        .route(
            "/v1/collectors",
            axum::routing::post(collector_handlers::create_collector),
        )
        .route(
            "/v1/collectors/:clerk_id",
            axum::routing::get(collector_handlers::get_collector),
        )
        .route(
            "/v1/collectors/:clerk_id/rfid",
            axum::routing::put(collector_handlers::bind_rfid),
        )
        .route(
            "/v1/reviews",
            axum::routing::post(review_handlers::create_review),
        )
        .route(
            "/v1/requests",
            axum::routing::post(request_handlers::create_request),
        )
        .route(
            "/v1/requests/:request_id",
            axum::routing::get(request_handlers::get_request),
        )
        .route(
            "/v1/requests/:request_id/status",
            axum::routing::put(request_handlers::update_request_status),
        )
        .route(
            "/v1/requests/customer/:clerk_id",
            axum::routing::get(request_handlers::list_customer_requests),
        )
        .route(
            "/v1/requests/collector/:clerk_id",
            axum::routing::get(request_handlers::list_collector_requests),
        )
        .route(
            "/v1/companies",
            axum::routing::post(ledger_handlers::create_company),
        )
        .route(
            "/v1/companies/:company_id",
            axum::routing::get(ledger_handlers::get_company),
        )
        .route(
            "/v1/companies/:company_id/topup",
            axum::routing::post(ledger_handlers::top_up_company),
        )
        .route(
            "/v1/balances/:clerk_id",
            axum::routing::get(ledger_handlers::get_balance),
        )
        .route(
            "/v1/ops/device-token",
            axum::routing::post(ops_handlers::issue_device_token),
        )
        .route(
            "/v1/ops/notify-target/check",
            axum::routing::get(ops_handlers::notify_target_check),
        )
        .route(
            "/v1/ops/notify-deliveries",
            axum::routing::get(ops_handlers::list_notify_deliveries),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

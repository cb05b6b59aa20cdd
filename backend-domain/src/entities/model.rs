use serde::{Deserialize, Serialize};

use crate::value_objects::SettlementOutcome;

#[derive(Debug, Deserialize, Clone)]
pub struct SensorCreate {
    pub sensor_id: String,
    pub sensor_name: String,
    pub location: String,
    #[serde(default)]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusSignal {
    pub status: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RfidSignal {
    pub rfid: String,
}

/// Response for a processed status signal. `settlement` is present only
/// on a FULL -> EMPTY transition and names the terminal outcome of the
/// settlement sub-protocol.
#[derive(Debug, Serialize, Clone)]
pub struct StatusSignalResult {
    pub sensor_id: String,
    pub sensor_status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<String>,
}

impl StatusSignalResult {
    pub fn opened(sensor_id: String) -> Self {
        Self {
            sensor_id,
            sensor_status: true,
            settlement: None,
        }
    }

    pub fn closed(sensor_id: String, outcome: &SettlementOutcome) -> Self {
        Self {
            sensor_id,
            sensor_status: false,
            settlement: Some(outcome.as_str().to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SensorLogQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CollectorCreate {
    pub clerk_id: String,
    #[serde(default)]
    pub rfid: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RfidBind {
    pub rfid: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewCreate {
    pub customer_clerk_id: String,
    pub ragpicker_clerk_id: String,
    pub rating: f64,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestCreate {
    pub customer_clerk_id: String,
    pub ragpicker_clerk_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestStatusUpdate {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompanyCreate {
    pub company_name: String,
    #[serde(default)]
    pub balance: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompanyTopUp {
    pub amount: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceTokenRequest {
    pub sensor_id: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct DeviceTokenResponse {
    pub sensor_id: String,
    pub token: String,
}

/// Record of one notification delivery attempt, kept in a bounded
/// in-memory buffer for the ops surface.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotifyDeliveryRecord {
    pub timestamp_ms: i64,
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub device_secret: Option<String>,
    pub notify_webhook_url: Option<String>,
    pub notify_webhook_template: Option<String>,
    pub identity_url: Option<String>,
    pub identity_retry_attempts: u32,
    pub identity_retry_delay_ms: u64,
    pub payout_amount: i64,
    pub transfer_amount: i64,
    pub allow_negative_customer_balance: bool,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

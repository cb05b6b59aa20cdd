//! Shared test helpers for the backend integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use backend_application::commands::{collector_commands, company_commands, sensor_commands};
use backend_application::{AppState, Metrics, SensorLockRegistry};
use backend_domain::ports::{IdentityProvider, Notifier};
use backend_domain::{
    CollectorCreate,
    CompanyCreate,
    NotifyDeliveryRecord,
    RuntimeConfig,
    SensorCreate,
    UserRole,
};
use backend_infrastructure::MemoryStore;

/// Notifier double: records every message synchronously, or simulates a
/// dead delivery target when `fail` is set. Either way nothing ever
/// propagates to the caller, matching the production contract.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    messages: std::sync::Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            messages: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn spawn_send(&self, _config: RuntimeConfig, message: String) {
        if self.fail {
            return;
        }
        self.messages.lock().expect("messages lock").push(message);
    }

    async fn check_notify_target(&self, _config: &RuntimeConfig) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("notify target unreachable");
        }
        Ok(())
    }

    async fn recent_deliveries(&self, _limit: usize) -> Vec<NotifyDeliveryRecord> {
        Vec::new()
    }
}

pub struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn lookup_role(
        &self,
        _config: &RuntimeConfig,
        _clerk_id: &str,
    ) -> anyhow::Result<Option<UserRole>> {
        Ok(Some(UserRole::Ragpicker))
    }
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        device_secret: None,
        notify_webhook_url: None,
        notify_webhook_template: None,
        identity_url: None,
        identity_retry_attempts: 1,
        identity_retry_delay_ms: 10,
        payout_amount: 60,
        transfer_amount: 100,
        allow_negative_customer_balance: true,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 3,
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness() -> TestHarness {
    harness_custom(|_| {})
}

pub fn harness_custom(mutate: impl FnOnce(&mut RuntimeConfig)) -> TestHarness {
    let mut config = test_config();
    mutate(&mut config);
    build_harness(config, Arc::new(RecordingNotifier::default()))
}

pub fn harness_failing_notifier() -> TestHarness {
    build_harness(test_config(), Arc::new(RecordingNotifier::failing()))
}

fn build_harness(config: RuntimeConfig, notifier: Arc<RecordingNotifier>) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        config,
        sensor_repo: store.clone(),
        event_repo: store.clone(),
        collector_repo: store.clone(),
        ledger_repo: store.clone(),
        request_repo: store.clone(),
        review_repo: store.clone(),
        notifier: notifier.clone(),
        identity: Arc::new(StaticIdentity),
        metrics: Arc::new(Metrics::default()),
        sensor_locks: Arc::new(SensorLockRegistry::default()),
    };
    TestHarness {
        state,
        store,
        notifier,
    }
}

pub async fn seed_company(state: &AppState, balance: i64) -> i64 {
    company_commands::create_company(
        state,
        CompanyCreate {
            company_name: "EcoWaste Ltd".to_string(),
            balance,
        },
    )
    .await
    .expect("seed company")
    .id
}

pub async fn seed_sensor(state: &AppState, sensor_id: &str, company_id: Option<i64>) {
    sensor_commands::register_sensor(
        state,
        SensorCreate {
            sensor_id: sensor_id.to_string(),
            sensor_name: format!("{} bin", sensor_id),
            location: "Market Rd".to_string(),
            company_id,
        },
    )
    .await
    .expect("seed sensor");
}

pub async fn seed_collector(state: &AppState, clerk_id: &str, rfid: Option<&str>) {
    collector_commands::register_collector(
        state,
        CollectorCreate {
            clerk_id: clerk_id.to_string(),
            rfid: rfid.map(ToString::to_string),
        },
    )
    .await
    .expect("seed collector");
}

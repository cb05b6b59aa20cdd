use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use backend_application::{AppState, Metrics, SensorLockRegistry};
use backend_domain::ports::{
    BinEventRepository,
    CollectorRepository,
    LedgerRepository,
    RequestRepository,
    ReviewRepository,
    SensorRepository,
};
use backend_domain::RuntimeConfig;
use backend_infrastructure::{
    AppConfig, HttpIdentityProvider, MemoryStore, PostgresStore, WebhookNotifier,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let state = if db_config.database_url.is_some() {
            let store = Arc::new(PostgresStore::connect(&db_config).await?);
            store.ensure_schema().await?;
            build_state(runtime_config, store)
        } else {
            warn!("database_url not configured, using in-memory store");
            build_state(runtime_config, Arc::new(MemoryStore::new()))
        };

        Ok(Self { state })
    }
}

fn build_state<S>(config: RuntimeConfig, store: Arc<S>) -> AppState
where
    S: SensorRepository
        + BinEventRepository
        + CollectorRepository
        + LedgerRepository
        + RequestRepository
        + ReviewRepository
        + 'static,
{
    AppState {
        config,
        sensor_repo: store.clone(),
        event_repo: store.clone(),
        collector_repo: store.clone(),
        ledger_repo: store.clone(),
        request_repo: store.clone(),
        review_repo: store,
        notifier: Arc::new(WebhookNotifier::new()),
        identity: Arc::new(HttpIdentityProvider::new()),
        metrics: Arc::new(Metrics::default()),
        sensor_locks: Arc::new(SensorLockRegistry::default()),
    }
}

use std::sync::Arc;

use backend_domain::ports::{
    BinEventRepository,
    CollectorRepository,
    IdentityProvider,
    LedgerRepository,
    Notifier,
    RequestRepository,
    ReviewRepository,
    SensorRepository,
};
use backend_domain::RuntimeConfig;

use crate::{Metrics, SensorLockRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub sensor_repo: Arc<dyn SensorRepository>,
    pub event_repo: Arc<dyn BinEventRepository>,
    pub collector_repo: Arc<dyn CollectorRepository>,
    pub ledger_repo: Arc<dyn LedgerRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub identity: Arc<dyn IdentityProvider>,
    pub metrics: Arc<Metrics>,
    pub sensor_locks: Arc<SensorLockRegistry>,
}

use async_trait::async_trait;

use crate::entities::{NotifyDeliveryRecord, RuntimeConfig};
use crate::value_objects::UserRole;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Fire-and-forget delivery. Failures are recorded and logged inside
    /// the spawned task; callers never observe them.
    fn spawn_send(&self, config: RuntimeConfig, message: String);
    async fn check_notify_target(&self, config: &RuntimeConfig) -> anyhow::Result<()>;
    async fn recent_deliveries(&self, limit: usize) -> Vec<NotifyDeliveryRecord>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Role of the external id, or None when the provider does not know
    /// the id. Errors are transport failures after retries are exhausted.
    async fn lookup_role(
        &self,
        config: &RuntimeConfig,
        clerk_id: &str,
    ) -> anyhow::Result<Option<UserRole>>;
}

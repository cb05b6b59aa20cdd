use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    Balance,
    BinEvent,
    CollectorProfile,
    CompanyBalance,
    PickupRequest,
    Review,
    Sensor,
    TransferOutcome,
};
use crate::value_objects::RequestStatus;

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Returns false when a sensor with the same id already exists.
    async fn insert_sensor(&self, sensor: &Sensor) -> anyhow::Result<bool>;
    async fn fetch_sensor(&self, sensor_id: &str) -> anyhow::Result<Option<Sensor>>;
    async fn list_sensors(&self) -> anyhow::Result<Vec<Sensor>>;
    async fn set_sensor_status(&self, sensor_id: &str, status: bool) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait BinEventRepository: Send + Sync {
    /// Append a new log row with the given resulting status and no RFID.
    /// The timestamp is assigned at write time.
    async fn append_event(&self, sensor_id: &str, status: bool) -> anyhow::Result<BinEvent>;
    /// The sensor's most recent row with status=true, if any. Rows with
    /// status=true are exactly the unresolved collections, so at most one
    /// exists per sensor.
    async fn find_active_event(&self, sensor_id: &str) -> anyhow::Result<Option<BinEvent>>;
    async fn attach_rfid(&self, event_id: Uuid, rfid: &str) -> anyhow::Result<()>;
    /// Flip the event's status to false and refresh its timestamp.
    async fn close_event(&self, event_id: Uuid) -> anyhow::Result<()>;
    /// Most recent first.
    async fn fetch_events(&self, sensor_id: &str, limit: usize) -> anyhow::Result<Vec<BinEvent>>;
}

#[async_trait]
pub trait CollectorRepository: Send + Sync {
    /// Returns false when a profile with the same clerk id already exists.
    async fn insert_collector(&self, collector: &CollectorProfile) -> anyhow::Result<bool>;
    async fn fetch_collector(&self, clerk_id: &str) -> anyhow::Result<Option<CollectorProfile>>;
    async fn find_by_rfid(&self, rfid: &str) -> anyhow::Result<Option<CollectorProfile>>;
    async fn bind_rfid(&self, clerk_id: &str, rfid: &str) -> anyhow::Result<()>;
    async fn set_average_rating(&self, clerk_id: &str, rating: f64) -> anyhow::Result<()>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Missing rows read as zero; the row itself is only written by
    /// `credit`, `payout` and `transfer`.
    async fn fetch_balance(&self, clerk_id: &str) -> anyhow::Result<Balance>;
    /// Read-or-create at zero, add, persist. Returns the new balance.
    async fn credit(&self, clerk_id: &str, amount: i64) -> anyhow::Result<i64>;
    /// Atomic company debit + collector credit. The funds check happens
    /// under the same lock as the mutation so a concurrent payout cannot
    /// overdraw the company.
    async fn payout(
        &self,
        company_id: i64,
        clerk_id: &str,
        amount: i64,
    ) -> anyhow::Result<TransferOutcome>;
    /// Atomic party-to-party transfer. Both sides are created at zero if
    /// absent; when `allow_negative` is false the debit is refused rather
    /// than driving the payer below zero.
    async fn transfer(
        &self,
        from_clerk_id: &str,
        to_clerk_id: &str,
        amount: i64,
        allow_negative: bool,
    ) -> anyhow::Result<TransferOutcome>;
    async fn insert_company(
        &self,
        company_name: &str,
        opening_balance: i64,
    ) -> anyhow::Result<CompanyBalance>;
    async fn fetch_company(&self, company_id: i64) -> anyhow::Result<Option<CompanyBalance>>;
    /// Returns the new balance, or None when the company does not exist.
    async fn credit_company(&self, company_id: i64, amount: i64) -> anyhow::Result<Option<i64>>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert_request(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
    ) -> anyhow::Result<PickupRequest>;
    async fn fetch_request(&self, id: i64) -> anyhow::Result<Option<PickupRequest>>;
    async fn list_by_customer(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> anyhow::Result<Vec<PickupRequest>>;
    async fn list_by_collector(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> anyhow::Result<Vec<PickupRequest>>;
    async fn set_request_status(&self, id: i64, status: RequestStatus) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert_review(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
        rating: f64,
        review: &str,
    ) -> anyhow::Result<Review>;
    async fn ratings_for_collector(&self, clerk_id: &str) -> anyhow::Result<Vec<f64>>;
}

// In-memory store
// Backs the service when no database_url is configured, and the test
// suite. One lock over the whole state makes every multi-row mutation
// atomic, matching the transactional guarantees of the Postgres store.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use backend_domain::ports::{
    BinEventRepository,
    CollectorRepository,
    LedgerRepository,
    RequestRepository,
    ReviewRepository,
    SensorRepository,
};
use backend_domain::{
    Balance,
    BinEvent,
    CollectorProfile,
    CompanyBalance,
    PickupRequest,
    RequestStatus,
    Review,
    Sensor,
    TransferOutcome,
};

#[derive(Default)]
struct MemState {
    sensors: HashMap<String, Sensor>,
    events: Vec<BinEvent>,
    collectors: HashMap<String, CollectorProfile>,
    balances: HashMap<String, i64>,
    companies: HashMap<i64, CompanyBalance>,
    next_company_id: i64,
    requests: HashMap<i64, PickupRequest>,
    next_request_id: i64,
    reviews: Vec<Review>,
    next_review_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn credit_entry(balances: &mut HashMap<String, i64>, clerk_id: &str, amount: i64) -> i64 {
    let entry = balances.entry(clerk_id.to_string()).or_insert(0);
    *entry += amount;
    *entry
}

#[async_trait]
impl SensorRepository for MemoryStore {
    async fn insert_sensor(&self, sensor: &Sensor) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.sensors.contains_key(&sensor.sensor_id) {
            return Ok(false);
        }
        state
            .sensors
            .insert(sensor.sensor_id.clone(), sensor.clone());
        Ok(true)
    }

    async fn fetch_sensor(&self, sensor_id: &str) -> Result<Option<Sensor>> {
        let state = self.state.read().await;
        Ok(state.sensors.get(sensor_id).cloned())
    }

    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        let state = self.state.read().await;
        let mut sensors: Vec<Sensor> = state.sensors.values().cloned().collect();
        sensors.sort_by(|a, b| a.sensor_id.cmp(&b.sensor_id));
        Ok(sensors)
    }

    async fn set_sensor_status(&self, sensor_id: &str, status: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let sensor = state
            .sensors
            .get_mut(sensor_id)
            .ok_or_else(|| anyhow!("sensor '{}' not found", sensor_id))?;
        sensor.sensor_status = status;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl BinEventRepository for MemoryStore {
    async fn append_event(&self, sensor_id: &str, status: bool) -> Result<BinEvent> {
        let mut state = self.state.write().await;
        let event = BinEvent {
            id: Uuid::new_v4(),
            sensor_id: sensor_id.to_string(),
            sensor_status: status,
            rfid: None,
            timestamp: Utc::now(),
        };
        state.events.push(event.clone());
        Ok(event)
    }

    async fn find_active_event(&self, sensor_id: &str) -> Result<Option<BinEvent>> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .rev()
            .find(|event| event.sensor_id == sensor_id && event.sensor_status)
            .cloned())
    }

    async fn attach_rfid(&self, event_id: Uuid, rfid: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let event = state
            .events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or_else(|| anyhow!("event {} not found", event_id))?;
        event.rfid = Some(rfid.to_string());
        Ok(())
    }

    async fn close_event(&self, event_id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let event = state
            .events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or_else(|| anyhow!("event {} not found", event_id))?;
        event.sensor_status = false;
        event.timestamp = Utc::now();
        Ok(())
    }

    async fn fetch_events(&self, sensor_id: &str, limit: usize) -> Result<Vec<BinEvent>> {
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .rev()
            .filter(|event| event.sensor_id == sensor_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CollectorRepository for MemoryStore {
    async fn insert_collector(&self, collector: &CollectorProfile) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.collectors.contains_key(&collector.clerk_id) {
            return Ok(false);
        }
        state
            .collectors
            .insert(collector.clerk_id.clone(), collector.clone());
        Ok(true)
    }

    async fn fetch_collector(&self, clerk_id: &str) -> Result<Option<CollectorProfile>> {
        let state = self.state.read().await;
        Ok(state.collectors.get(clerk_id).cloned())
    }

    async fn find_by_rfid(&self, rfid: &str) -> Result<Option<CollectorProfile>> {
        let state = self.state.read().await;
        Ok(state
            .collectors
            .values()
            .find(|collector| collector.rfid.as_deref() == Some(rfid))
            .cloned())
    }

    async fn bind_rfid(&self, clerk_id: &str, rfid: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let collector = state
            .collectors
            .get_mut(clerk_id)
            .ok_or_else(|| anyhow!("collector '{}' not found", clerk_id))?;
        collector.rfid = Some(rfid.to_string());
        Ok(())
    }

    async fn set_average_rating(&self, clerk_id: &str, rating: f64) -> Result<()> {
        let mut state = self.state.write().await;
        let collector = state
            .collectors
            .get_mut(clerk_id)
            .ok_or_else(|| anyhow!("collector '{}' not found", clerk_id))?;
        collector.average_rating = rating;
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn fetch_balance(&self, clerk_id: &str) -> Result<Balance> {
        let state = self.state.read().await;
        Ok(Balance {
            clerk_id: clerk_id.to_string(),
            balance: state.balances.get(clerk_id).copied().unwrap_or(0),
        })
    }

    async fn credit(&self, clerk_id: &str, amount: i64) -> Result<i64> {
        let mut state = self.state.write().await;
        Ok(credit_entry(&mut state.balances, clerk_id, amount))
    }

    async fn payout(
        &self,
        company_id: i64,
        clerk_id: &str,
        amount: i64,
    ) -> Result<TransferOutcome> {
        let mut state = self.state.write().await;
        let Some(company) = state.companies.get_mut(&company_id) else {
            return Ok(TransferOutcome::MissingAccount);
        };
        if company.balance < amount {
            return Ok(TransferOutcome::InsufficientFunds {
                available: company.balance,
            });
        }
        company.balance -= amount;
        let from_balance = company.balance;
        let to_balance = credit_entry(&mut state.balances, clerk_id, amount);
        Ok(TransferOutcome::Completed {
            from_balance,
            to_balance,
        })
    }

    async fn transfer(
        &self,
        from_clerk_id: &str,
        to_clerk_id: &str,
        amount: i64,
        allow_negative: bool,
    ) -> Result<TransferOutcome> {
        let mut state = self.state.write().await;
        let available = credit_entry(&mut state.balances, from_clerk_id, 0);
        if !allow_negative && available < amount {
            return Ok(TransferOutcome::InsufficientFunds { available });
        }
        let from_balance = credit_entry(&mut state.balances, from_clerk_id, -amount);
        let to_balance = credit_entry(&mut state.balances, to_clerk_id, amount);
        Ok(TransferOutcome::Completed {
            from_balance,
            to_balance,
        })
    }

    async fn insert_company(
        &self,
        company_name: &str,
        opening_balance: i64,
    ) -> Result<CompanyBalance> {
        let mut state = self.state.write().await;
        state.next_company_id += 1;
        let company = CompanyBalance {
            id: state.next_company_id,
            company_name: company_name.to_string(),
            balance: opening_balance,
        };
        state.companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn fetch_company(&self, company_id: i64) -> Result<Option<CompanyBalance>> {
        let state = self.state.read().await;
        Ok(state.companies.get(&company_id).cloned())
    }

    async fn credit_company(&self, company_id: i64, amount: i64) -> Result<Option<i64>> {
        let mut state = self.state.write().await;
        Ok(state.companies.get_mut(&company_id).map(|company| {
            company.balance += amount;
            company.balance
        }))
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn insert_request(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
    ) -> Result<PickupRequest> {
        let mut state = self.state.write().await;
        state.next_request_id += 1;
        let request = PickupRequest {
            id: state.next_request_id,
            customer_clerk_id: customer_clerk_id.to_string(),
            ragpicker_clerk_id: ragpicker_clerk_id.to_string(),
            status: RequestStatus::PENDING,
            created_at: Utc::now(),
            updated_at: None,
        };
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn fetch_request(&self, id: i64) -> Result<Option<PickupRequest>> {
        let state = self.state.read().await;
        Ok(state.requests.get(&id).cloned())
    }

    async fn list_by_customer(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<PickupRequest> = state
            .requests
            .values()
            .filter(|request| request.customer_clerk_id == clerk_id)
            .filter(|request| status.map_or(true, |wanted| request.status == wanted))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(requests)
    }

    async fn list_by_collector(
        &self,
        clerk_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PickupRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<PickupRequest> = state
            .requests
            .values()
            .filter(|request| request.ragpicker_clerk_id == clerk_id)
            .filter(|request| status.map_or(true, |wanted| request.status == wanted))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(requests)
    }

    async fn set_request_status(&self, id: i64, status: RequestStatus) -> Result<()> {
        let mut state = self.state.write().await;
        let request = state
            .requests
            .get_mut(&id)
            .ok_or_else(|| anyhow!("request {} not found", id))?;
        request.status = status;
        request.updated_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert_review(
        &self,
        customer_clerk_id: &str,
        ragpicker_clerk_id: &str,
        rating: f64,
        review: &str,
    ) -> Result<Review> {
        let mut state = self.state.write().await;
        state.next_review_id += 1;
        let review = Review {
            id: state.next_review_id,
            customer_clerk_id: customer_clerk_id.to_string(),
            ragpicker_clerk_id: ragpicker_clerk_id.to_string(),
            rating,
            review: review.to_string(),
            created_at: Utc::now(),
        };
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn ratings_for_collector(&self, clerk_id: &str) -> Result<Vec<f64>> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .filter(|review| review.ragpicker_clerk_id == clerk_id)
            .map(|review| review.rating)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn payout_debits_and_credits_in_one_step() {
        let store = MemoryStore::new();
        let company = store.insert_company("EcoWaste", 100).await.expect("company");

        let outcome = store.payout(company.id, "collector_1", 60).await.expect("payout");
        assert_eq!(
            outcome,
            TransferOutcome::Completed {
                from_balance: 40,
                to_balance: 60
            }
        );
        let company = store.fetch_company(company.id).await.expect("fetch").expect("exists");
        assert_eq!(company.balance, 40);
        assert_eq!(store.fetch_balance("collector_1").await.expect("balance").balance, 60);
    }

    #[tokio::test]
    async fn insufficient_payout_touches_nothing() {
        let store = MemoryStore::new();
        let company = store.insert_company("EcoWaste", 40).await.expect("company");

        let outcome = store.payout(company.id, "collector_1", 60).await.expect("payout");
        assert_eq!(outcome, TransferOutcome::InsufficientFunds { available: 40 });
        let company = store.fetch_company(company.id).await.expect("fetch").expect("exists");
        assert_eq!(company.balance, 40);
        assert_eq!(store.fetch_balance("collector_1").await.expect("balance").balance, 0);
    }

    #[tokio::test]
    async fn payout_against_unknown_company_is_reported() {
        let store = MemoryStore::new();
        let outcome = store.payout(99, "collector_1", 60).await.expect("payout");
        assert_eq!(outcome, TransferOutcome::MissingAccount);
        assert_eq!(store.fetch_balance("collector_1").await.expect("balance").balance, 0);
    }

    #[tokio::test]
    async fn transfer_floor_refuses_overdraft() {
        let store = MemoryStore::new();
        store.credit("customer_1", 40).await.expect("credit");

        let outcome = store
            .transfer("customer_1", "collector_1", 100, false)
            .await
            .expect("transfer");
        assert_eq!(outcome, TransferOutcome::InsufficientFunds { available: 40 });
        assert_eq!(store.fetch_balance("customer_1").await.expect("balance").balance, 40);
        assert_eq!(store.fetch_balance("collector_1").await.expect("balance").balance, 0);
    }

    #[tokio::test]
    async fn transfer_may_go_negative_when_allowed() {
        let store = MemoryStore::new();
        let outcome = store
            .transfer("customer_1", "collector_1", 100, true)
            .await
            .expect("transfer");
        assert_eq!(
            outcome,
            TransferOutcome::Completed {
                from_balance: -100,
                to_balance: 100
            }
        );
    }

    #[tokio::test]
    async fn credit_zero_materializes_the_row() {
        let store = MemoryStore::new();
        assert_eq!(store.credit("customer_1", 0).await.expect("credit"), 0);
        assert_eq!(store.fetch_balance("customer_1").await.expect("balance").balance, 0);
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes state transitions per sensor. Every `update_status` and
/// `attach_rfid` call holds the sensor's lock across the whole
/// read-validate-write sequence, so two concurrent EMPTY -> FULL signals
/// for the same sensor cannot both observe "no open event". Signals for
/// different sensors never contend.
#[derive(Default)]
pub struct SensorLockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SensorLockRegistry {
    pub async fn acquire(&self, sensor_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(sensor_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

// Sensor entity
// A deployed smart-bin fill sensor and its append-only event log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_id: String,
    pub sensor_name: String,
    pub location: String,
    pub company_id: Option<i64>,
    pub sensor_status: bool,
}

/// One row of a sensor's event log. Rows are append-only, with two
/// exceptions: the open event may have an RFID attached, and the open
/// event's status is flipped to false (timestamp refreshed) when the bin
/// is emptied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinEvent {
    pub id: Uuid,
    pub sensor_id: String,
    pub sensor_status: bool,
    pub rfid: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BinEvent {
    /// An open event is a collection in progress: the bin reported full
    /// and no collector has tapped in yet. Invariant: at most one per
    /// sensor at any time.
    pub fn is_open(&self) -> bool {
        self.sensor_status && self.rfid.is_none()
    }
}

// Pickup request entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::RequestStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupRequest {
    pub id: i64,
    pub customer_clerk_id: String,
    pub ragpicker_clerk_id: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

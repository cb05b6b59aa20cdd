// Review entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub customer_clerk_id: String,
    pub ragpicker_clerk_id: String,
    pub rating: f64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

// Collector (ragpicker) entity

use serde::{Deserialize, Serialize};

/// Profile row for a collector, keyed by the external identity id.
/// `average_rating` is derived from the review aggregate and recomputed
/// whenever a review is written; it is never persisted null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorProfile {
    pub clerk_id: String,
    pub rfid: Option<String>,
    pub average_rating: f64,
}

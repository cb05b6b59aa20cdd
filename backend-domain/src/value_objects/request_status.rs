// Request status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    PENDING,
    ACCEPTED,
    REJECTED,
    COMPLETED,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PENDING => "PENDING",
            RequestStatus::ACCEPTED => "ACCEPTED",
            RequestStatus::REJECTED => "REJECTED",
            RequestStatus::COMPLETED => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Some(RequestStatus::PENDING),
            "ACCEPTED" => Some(RequestStatus::ACCEPTED),
            "REJECTED" => Some(RequestStatus::REJECTED),
            "COMPLETED" => Some(RequestStatus::COMPLETED),
            _ => None,
        }
    }

    /// Valid lifecycle moves: PENDING -> ACCEPTED | REJECTED,
    /// ACCEPTED -> COMPLETED. Everything else is a conflict.
    pub fn can_become(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::PENDING, RequestStatus::ACCEPTED)
                | (RequestStatus::PENDING, RequestStatus::REJECTED)
                | (RequestStatus::ACCEPTED, RequestStatus::COMPLETED)
        )
    }
}

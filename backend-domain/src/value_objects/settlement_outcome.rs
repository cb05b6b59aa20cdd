// Settlement outcome value object
// Terminal results of the settlement sub-protocol; none of these are
// errors in the exceptional sense

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettlementOutcome {
    Paid { amount: i64, collector_balance: i64 },
    SkippedInsufficientFunds { available: i64 },
    MissingCollector,
    MissingCompany,
}

impl SettlementOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementOutcome::Paid { .. } => "PAID",
            SettlementOutcome::SkippedInsufficientFunds { .. } => "SKIPPED_INSUFFICIENT_FUNDS",
            SettlementOutcome::MissingCollector => "SKIPPED_MISSING_COLLECTOR",
            SettlementOutcome::MissingCompany => "SKIPPED_MISSING_COMPANY",
        }
    }
}

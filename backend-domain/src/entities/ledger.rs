// Ledger entities
// Token balances for marketplace parties and bin-owning companies

use serde::{Deserialize, Serialize};

/// One row per party. Absence means zero: creation paths write the row at
/// zero rather than leaving readers to default a missing value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub clerk_id: String,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyBalance {
    pub id: i64,
    pub company_name: String,
    pub balance: i64,
}

/// Result of an atomic two-sided balance mutation. The debit and credit
/// either both happened or neither did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed { from_balance: i64, to_balance: i64 },
    InsufficientFunds { available: i64 },
    MissingAccount,
}

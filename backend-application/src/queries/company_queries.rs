use backend_domain::CompanyBalance;

use crate::{AppError, AppState};

pub async fn get_company(state: &AppState, company_id: i64) -> Result<CompanyBalance, AppError> {
    state
        .ledger_repo
        .fetch_company(company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("company {} not found", company_id)))
}

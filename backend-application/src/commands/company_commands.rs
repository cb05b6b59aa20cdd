use anyhow::anyhow;

use backend_domain::{CompanyBalance, CompanyCreate, CompanyTopUp};

use crate::commands::normalize_required;
use crate::{AppError, AppState};

pub async fn create_company(
    state: &AppState,
    payload: CompanyCreate,
) -> Result<CompanyBalance, AppError> {
    let company_name = normalize_required(payload.company_name, "company_name")?;
    if payload.balance < 0 {
        return Err(AppError::BadRequest(
            "opening balance must not be negative".to_string(),
        ));
    }
    let company = state
        .ledger_repo
        .insert_company(&company_name, payload.balance)
        .await?;
    Ok(company)
}

pub async fn top_up_company(
    state: &AppState,
    company_id: i64,
    payload: CompanyTopUp,
) -> Result<CompanyBalance, AppError> {
    if payload.amount <= 0 {
        return Err(AppError::BadRequest(
            "top-up amount must be positive".to_string(),
        ));
    }
    match state
        .ledger_repo
        .credit_company(company_id, payload.amount)
        .await?
    {
        Some(_) => state
            .ledger_repo
            .fetch_company(company_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow!("company {} vanished", company_id))),
        None => Err(AppError::NotFound(format!(
            "company {} not found",
            company_id
        ))),
    }
}

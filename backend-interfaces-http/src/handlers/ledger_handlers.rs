use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::company_commands;
use backend_application::queries::{balance_queries, company_queries};
use backend_application::AppState;
use backend_domain::{Balance, CompanyBalance, CompanyCreate, CompanyTopUp};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_balance(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Balance>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let balance = balance_queries::get_balance(&state, &clerk_id).await?;
    Ok(Json(balance))
}

pub async fn create_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CompanyCreate>,
) -> Result<(StatusCode, Json<CompanyBalance>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let company = company_commands::create_company(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<CompanyBalance>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let company = company_queries::get_company(&state, company_id).await?;
    Ok(Json(company))
}

pub async fn top_up_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<CompanyTopUp>,
) -> Result<Json<CompanyBalance>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let company = company_commands::top_up_company(&state, company_id, payload).await?;
    Ok(Json(company))
}

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::review_commands;
use backend_application::AppState;
use backend_domain::{Review, ReviewCreate};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn create_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReviewCreate>,
) -> Result<(StatusCode, Json<Review>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let review = review_commands::submit_review(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

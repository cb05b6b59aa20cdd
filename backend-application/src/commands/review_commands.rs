use backend_domain::services::average_rating;
use backend_domain::{Review, ReviewCreate};

use crate::commands::normalize_required;
use crate::{AppError, AppState};

pub async fn submit_review(state: &AppState, payload: ReviewCreate) -> Result<Review, AppError> {
    let customer = normalize_required(payload.customer_clerk_id, "customer_clerk_id")?;
    let ragpicker = normalize_required(payload.ragpicker_clerk_id, "ragpicker_clerk_id")?;
    if !(0.0..=5.0).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 0 and 5".to_string(),
        ));
    }
    if state
        .collector_repo
        .fetch_collector(&ragpicker)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "collector '{}' not found",
            ragpicker
        )));
    }

    let review = state
        .review_repo
        .insert_review(&customer, &ragpicker, payload.rating, payload.review.trim())
        .await?;

    // Recompute and persist the aggregate in the same operation, so no
    // read path ever has to default a missing rating.
    let ratings = state.review_repo.ratings_for_collector(&ragpicker).await?;
    state
        .collector_repo
        .set_average_rating(&ragpicker, average_rating(&ratings))
        .await?;
    Ok(review)
}

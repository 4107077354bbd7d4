use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{
    DeleteReviewResponse, ReviewListResponse, ReviewPageQuery, UpdateReviewRequest,
    UpdateReviewResponse,
};
use super::repo_types::ReviewChanges;
use crate::{
    error::AppError,
    extract::{parse_id, ApiJson, ApiQuery},
    pagination::PageRequest,
    state::AppState,
};

pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/productReview/admin", get(list_reviews))
        .route(
            "/productReview/admin/:id",
            put(update_review).delete(delete_review),
        )
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReviewPageQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let req = PageRequest::new(query.page, query.limit, None);
    let page = state.reviews.list(&req).await?;
    let total_pages = page.total_pages();

    Ok(Json(ReviewListResponse {
        success: true,
        total_reviews: page.total,
        current_page: page.page,
        total_pages,
        data: page.items,
    }))
}

fn review_changes(payload: UpdateReviewRequest) -> Result<ReviewChanges, AppError> {
    let title = payload.title.map(|t| t.trim().to_string());
    if title.as_deref() == Some("") {
        return Err(AppError::Validation("Title cannot be empty".into()));
    }
    if let Some(rating) = payload.rating {
        if !RATING_RANGE.contains(&rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }
    }

    let changes = ReviewChanges {
        title,
        description: payload.description.map(|d| d.trim().to_string()),
        rating: payload.rating,
    };
    if changes.is_empty() {
        return Err(AppError::Validation(
            "At least one of title, description or rating is required".into(),
        ));
    }
    Ok(changes)
}

#[instrument(skip(state, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateReviewRequest>,
) -> Result<Json<UpdateReviewResponse>, AppError> {
    let id = parse_id(&raw_id, "review")?;
    let changes = review_changes(payload)?;

    let review = state
        .reviews
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    info!(review_id = id, "review updated");
    Ok(Json(UpdateReviewResponse {
        success: true,
        data: review,
    }))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteReviewResponse>, AppError> {
    let id = parse_id(&raw_id, "review")?;

    if !state.reviews.delete(id).await? {
        return Err(AppError::NotFound("Review not found".into()));
    }

    info!(review_id = id, "review deleted");
    Ok(Json(DeleteReviewResponse {
        success: true,
        message: "Review deleted successfully".into(),
    }))
}

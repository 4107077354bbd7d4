use serde::{Deserialize, Serialize};

use super::repo_types::Review;
use crate::pagination::empty_as_none;

/// Query string of the admin listing; reviews are not searchable.
#[derive(Debug, Deserialize)]
pub struct ReviewPageQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub success: bool,
    pub data: Vec<Review>,
    pub total_reviews: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct UpdateReviewResponse {
    pub success: bool,
    pub data: Review,
}

#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub success: bool,
    pub message: String,
}

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Product review as shown in the admin listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub rating: i32,
    pub product_name: Option<String>,
    pub user_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i32>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.rating.is_none()
    }
}

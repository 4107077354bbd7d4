use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Review, ReviewChanges};
use crate::pagination::{Page, PageRequest};

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Highest id first.
    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<Review>>;
    async fn update(&self, id: i64, changes: &ReviewChanges) -> anyhow::Result<Option<Review>>;
    /// `false` when no review had that id.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgReviewStore {
    db: PgPool,
}

impl PgReviewStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.product_id, r.user_id, r.title, r.description, r.rating,
           p.name AS product_name, u.name AS user_name,
           r.created_at, r.updated_at
"#;

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<Review>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_reviews")
            .fetch_one(&self.db)
            .await
            .context("count reviews")?;

        let items = sqlx::query_as::<_, Review>(&format!(
            r#"
            {REVIEW_SELECT}
              FROM product_reviews r
              LEFT JOIN products p ON p.id = r.product_id
              LEFT JOIN users u ON u.id = r.user_id
             ORDER BY r.id DESC
             LIMIT $1 OFFSET $2
            "#
        ))
        .bind(req.limit)
        .bind(req.offset())
        .fetch_all(&self.db)
        .await
        .context("list reviews")?;

        Ok(Page::new(items, total, req))
    }

    async fn update(&self, id: i64, changes: &ReviewChanges) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            WITH r AS (
                UPDATE product_reviews
                   SET title = COALESCE($2, title),
                       description = COALESCE($3, description),
                       rating = COALESCE($4, rating),
                       updated_at = now()
                 WHERE id = $1
                RETURNING *
            )
            {REVIEW_SELECT}
              FROM r
              LEFT JOIN products p ON p.id = r.product_id
              LEFT JOIN users u ON u.id = r.user_id
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.rating)
        .fetch_optional(&self.db)
        .await
        .context("update review")?;
        Ok(review)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM product_reviews WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected() > 0)
    }
}

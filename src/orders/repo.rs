use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Order, OrderDetails, OrderItem};
use crate::pagination::{Page, PageRequest};

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Newest first; search matches status, customer name or customer email.
    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<Order>>;
    async fn find_details(&self, id: i64) -> anyhow::Result<Option<OrderDetails>>;
}

#[derive(Clone)]
pub struct PgOrderStore {
    db: PgPool,
}

impl PgOrderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const ORDER_FROM: &str = r#"
      FROM orders o
      JOIN users u ON u.id = o.user_id
"#;

const ORDER_FILTER: &str = r#"
    ($1::text IS NULL
     OR o.status ILIKE $1
     OR u.name ILIKE $1
     OR u.email ILIKE $1)
"#;

const ORDER_COLUMNS: &str = r#"
    o.id, o.user_id, o.status, o.total_cents,
    u.name AS customer_name, u.email AS customer_email, o.created_at
"#;

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<Order>> {
        let pattern = req.like_pattern();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) {ORDER_FROM} WHERE {ORDER_FILTER}"
        ))
        .bind(&pattern)
        .fetch_one(&self.db)
        .await
        .context("count orders")?;

        let items = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            {ORDER_FROM}
             WHERE {ORDER_FILTER}
             ORDER BY o.created_at DESC, o.id DESC
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(req.limit)
        .bind(req.offset())
        .fetch_all(&self.db)
        .await
        .context("list orders")?;

        Ok(Page::new(items, total, req))
    }

    async fn find_details(&self, id: i64) -> anyhow::Result<Option<OrderDetails>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} {ORDER_FROM} WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find order")?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT product_name, quantity, unit_price_cents
              FROM order_items
             WHERE order_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await
        .context("list order items")?;

        Ok(Some(OrderDetails { order, items }))
    }
}

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Order row in the admin listing, with the customer it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub total_cents: i64,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

/// An order with its line items.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

use serde::{Deserialize, Serialize};

use super::repo_types::Order;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub data: Vec<Order>,
    pub total_orders: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppQuery {
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WhatsAppLinkResponse {
    pub url: String,
}

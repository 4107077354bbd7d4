use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, error, instrument};

use super::dto::{OrderListResponse, WhatsAppLinkResponse, WhatsAppQuery};
use super::whatsapp::{deep_link, order_summary};
use crate::{
    error::AppError,
    extract::{parse_id, ApiQuery},
    pagination::{PageQuery, PageRequest},
    state::AppState,
};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/admin", get(list_orders))
        .route("/whatsapp", get(whatsapp_link))
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let req = PageRequest::from(query);
    let page = state.orders.list(&req).await?;
    let total_pages = page.total_pages();

    Ok(Json(OrderListResponse {
        total_orders: page.total,
        total_pages,
        current_page: page.page,
        limit: page.limit,
        data: page.items,
    }))
}

#[instrument(skip(state))]
pub async fn whatsapp_link(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WhatsAppQuery>,
) -> Result<Json<WhatsAppLinkResponse>, AppError> {
    let raw = query
        .order_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("orderId is required".into()))?;
    let order_id = parse_id(&raw, "order")?;

    let details = state
        .orders
        .find_details(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    if state.config.whatsapp_number.is_empty() {
        error!("WHATSAPP_NUMBER is not configured");
        return Err(AppError::Internal(anyhow::anyhow!(
            "whatsapp number not configured"
        )));
    }

    let url = deep_link(&state.config.whatsapp_number, &order_summary(&details));
    debug!(order_id, "whatsapp link built");
    Ok(Json(WhatsAppLinkResponse { url }))
}

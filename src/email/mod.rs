use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod mailer;

pub fn router() -> Router<AppState> {
    handlers::email_routes()
}

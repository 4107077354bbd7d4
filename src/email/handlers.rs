use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::mailer::OutgoingEmail;
use crate::{error::AppError, extract::ApiJson, state::AppState};

pub fn email_routes() -> Router<AppState> {
    Router::new().route("/email", post(send_email))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
}

fn required(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[instrument(skip(state, payload))]
pub async fn send_email(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let (Some(to), Some(subject), Some(body)) = (
        required(payload.to),
        required(payload.subject),
        required(payload.message),
    ) else {
        return Err(AppError::Validation(
            "to, subject and message are required".into(),
        ));
    };

    state
        .mailer
        .send(&OutgoingEmail { to, subject, body })
        .await?;

    info!("email sent");
    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent successfully".into(),
    }))
}

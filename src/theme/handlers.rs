use axum::{extract::State, routing::get, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, instrument};

use super::repo::Theme;
use crate::{error::AppError, extract::ApiJson, state::AppState};

pub fn theme_routes() -> Router<AppState> {
    Router::new().route("/theme", get(get_theme).post(set_theme))
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub pr: Option<String>,
    pub se: Option<String>,
    pub tx: Option<String>,
    pub bg: Option<String>,
}

fn is_hex_color(v: &str) -> bool {
    lazy_static! {
        static ref HEX_RE: Regex = Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
    }
    HEX_RE.is_match(v)
}

impl TryFrom<ThemeRequest> for Theme {
    type Error = AppError;

    fn try_from(req: ThemeRequest) -> Result<Self, Self::Error> {
        let color = |name: &str, v: Option<String>| -> Result<String, AppError> {
            let v = v
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
            if !is_hex_color(&v) {
                return Err(AppError::Validation(format!("{name} must be a hex color")));
            }
            Ok(v)
        };
        Ok(Theme {
            pr: color("pr", req.pr)?,
            se: color("se", req.se)?,
            tx: color("tx", req.tx)?,
            bg: color("bg", req.bg)?,
        })
    }
}

#[instrument(skip(state))]
pub async fn get_theme(State(state): State<AppState>) -> Result<Json<Theme>, AppError> {
    let theme = state.theme.get().await?.unwrap_or_default();
    Ok(Json(theme))
}

#[instrument(skip(state, payload))]
pub async fn set_theme(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ThemeRequest>,
) -> Result<Json<Theme>, AppError> {
    let theme = Theme::try_from(payload)?;
    let stored = state.theme.set(&theme).await?;
    info!(?stored, "theme updated");
    Ok(Json(stored))
}

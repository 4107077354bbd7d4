use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, GoogleSignupRequest, GoogleSignupResponse, LoginRequest, SignupRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::hash_password,
        services::{
            authenticate, is_valid_email, issue_session, normalize_email, resolve_third_party,
        },
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
    users::{dto::PublicUser, repo_types::NewUser},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/google-signup", post(google_signup))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let user = authenticate(
        state.users.as_ref(),
        payload.identifier.as_deref(),
        payload.password.as_deref(),
    )
    .await?;

    let headers = issue_session(&JwtKeys::from_ref(&state), &user, state.config.cookie_secure)?;

    info!(user_id = user.id, "user logged in");
    Ok((
        headers,
        Json(AuthResponse {
            message: "Login successful".into(),
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    let name = payload.name.map(|n| n.trim().to_string()).unwrap_or_default();
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let phone = payload
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    let password = payload.password.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    // Ensure neither email nor phone is taken
    let taken = match &phone {
        Some(p) => state.users.find_by_identifier(p).await?.is_some(),
        None => false,
    } || state.users.find_by_identifier(&email).await?.is_some();
    if taken {
        warn!(%email, "email or phone already registered");
        return Err(AppError::Conflict(
            "An account with this email or phone already exists".into(),
        ));
    }

    let password_hash = hash_password(&password)?;
    let user = state
        .users
        .create(NewUser {
            name,
            email,
            phone,
            password_hash,
        })
        .await?;

    let headers = issue_session(&JwtKeys::from_ref(&state), &user, state.config.cookie_secure)?;

    info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            message: "Signup successful".into(),
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn google_signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GoogleSignupRequest>,
) -> Result<(HeaderMap, Json<GoogleSignupResponse>), AppError> {
    let credential = payload
        .credential
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Invalid token".into()))?;

    let identity = state.identity.verify(credential.trim()).await.map_err(|e| {
        warn!(error = %e, "google credential rejected");
        AppError::from(e)
    })?;
    let user = resolve_third_party(state.users.as_ref(), &identity).await?;

    let headers = issue_session(&JwtKeys::from_ref(&state), &user, state.config.cookie_secure)?;

    Ok((
        headers,
        Json(GoogleSignupResponse {
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, claims))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser::from(user)))
}

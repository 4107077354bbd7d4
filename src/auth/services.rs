use axum::http::{header::SET_COOKIE, HeaderMap};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use super::{
    claims::SessionIdentity,
    cookie::session_cookie,
    google::ThirdPartyIdentity,
    jwt::JwtKeys,
    password::{has_local_password, verify_password, NO_LOCAL_PASSWORD},
};
use crate::{
    error::AppError,
    users::{repo::UserStore, repo_types::User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Emails compare case-insensitively; phones are matched as typed.
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    if trimmed.contains('@') {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Resolves a login attempt to a user.
///
/// An unknown identifier is reported as `NotFound`, distinct from a password
/// mismatch, which is always the generic "Invalid credentials".
pub async fn authenticate(
    users: &dyn UserStore,
    identifier: Option<&str>,
    password: Option<&str>,
) -> Result<User, AppError> {
    let identifier = identifier.map(normalize_identifier).unwrap_or_default();
    let password = password.unwrap_or_default();
    if identifier.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Identifier and password are required".into(),
        ));
    }

    let Some(user) = users.find_by_identifier(&identifier).await? else {
        warn!("login for unknown identifier");
        return Err(AppError::NotFound(
            "No account found with this email or phone".into(),
        ));
    };

    if !has_local_password(&user.password_hash) {
        warn!(user_id = user.id, "password login for account without local password");
        return Err(invalid_credentials());
    }

    let ok = verify_password(password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        AppError::Internal(e)
    })?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid_credentials());
    }

    Ok(user)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

/// Finds or provisions the local user for a verified third-party identity.
pub async fn resolve_third_party(
    users: &dyn UserStore,
    identity: &ThirdPartyIdentity,
) -> Result<User, AppError> {
    let user = users
        .upsert_by_email(&identity.email, &identity.name, NO_LOCAL_PASSWORD)
        .await?;
    info!(user_id = user.id, "third-party identity resolved");
    Ok(user)
}

/// Mints a session token for `user` and returns the `Set-Cookie` header carrying it.
pub fn issue_session(keys: &JwtKeys, user: &User, secure: bool) -> Result<HeaderMap, AppError> {
    let identity = SessionIdentity {
        id: user.id,
        display_id: if user.email.is_empty() {
            user.phone.clone().unwrap_or_default()
        } else {
            user.email.clone()
        },
    };
    let token = keys.sign(&identity).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    let cookie = session_cookie(&token, secure)
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("session cookie header")))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

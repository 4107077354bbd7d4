//! Google ID token verification.
//!
//! Tokens are checked against Google's published JWKS: RS256 signature, audience
//! (our client id), issuer and expiry. Keys are cached by `kid` and refetched when an
//! unknown `kid` shows up, at most once per [`MIN_REFRESH_INTERVAL`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{config::GoogleConfig, error::AppError};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Identity asserted by a verified third-party credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyIdentity {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no email claim")]
    MissingEmail,
    #[error("identity provider is not configured")]
    NotConfigured,
    #[error("fetching provider keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidToken(_)
            | IdentityError::Rejected(_)
            | IdentityError::MissingEmail => {
                AppError::Validation("Invalid token".into())
            }
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<ThirdPartyIdentity, IdentityError>;
}

#[derive(Debug, Deserialize)]
pub struct GoogleClaims {
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
}

/// Turns verified claims into an identity; the name falls back to the email's local part.
pub fn identity_from_claims(claims: GoogleClaims) -> Result<ThirdPartyIdentity, IdentityError> {
    let email = claims
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or(IdentityError::MissingEmail)?;
    if claims.email_verified == Some(false) {
        return Err(IdentityError::InvalidToken("email not verified".into()));
    }
    let name = claims
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
    Ok(ThirdPartyIdentity { email, name })
}

pub struct GoogleVerifier {
    http: reqwest::Client,
    certs_url: String,
    client_id: String,
    keys: RwLock<KeyCache>,
}

#[derive(Default)]
struct KeyCache {
    set: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<Jwk> {
        self.set.as_ref().and_then(|s| s.find(kid)).cloned()
    }

    fn fetched_recently(&self) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < MIN_REFRESH_INTERVAL)
    }
}

fn unknown_kid(kid: &str) -> IdentityError {
    IdentityError::InvalidToken(format!("unknown key id {kid}"))
}

impl GoogleVerifier {
    pub fn new(cfg: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            certs_url: cfg.certs_url.clone(),
            client_id: cfg.client_id.clone(),
            keys: RwLock::new(KeyCache::default()),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, IdentityError> {
        {
            let cache = self.keys.read().await;
            if let Some(jwk) = cache.find(kid) {
                return Ok(jwk);
            }
            if cache.fetched_recently() {
                return Err(unknown_kid(kid));
            }
        }

        let mut cache = self.keys.write().await;
        // a concurrent request may have refreshed while we waited for the lock
        if let Some(jwk) = cache.find(kid) {
            return Ok(jwk);
        }
        if cache.fetched_recently() {
            return Err(unknown_kid(kid));
        }

        debug!(%kid, "refreshing Google signing keys");
        // failed fetches count against the interval too
        cache.fetched_at = Some(Instant::now());
        let fresh: JwkSet = self
            .http
            .get(&self.certs_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        cache.set = Some(fresh);

        cache.find(kid).ok_or_else(|| unknown_kid(kid))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, credential: &str) -> Result<ThirdPartyIdentity, IdentityError> {
        if self.client_id.is_empty() {
            return Err(IdentityError::NotConfigured);
        }

        let header = decode_header(credential)?;
        if header.alg != Algorithm::RS256 {
            warn!(alg = ?header.alg, "rejecting Google token with unexpected algorithm");
            return Err(IdentityError::InvalidToken("unexpected algorithm".into()));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".into()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(std::slice::from_ref(&self.client_id));
        validation.set_issuer(&GOOGLE_ISSUERS);
        let data = decode::<GoogleClaims>(credential, &key, &validation)?;

        identity_from_claims(data.claims)
    }
}

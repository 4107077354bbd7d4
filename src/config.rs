use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub certs_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Adds `Secure` to the session cookie.
    pub cookie_secure: bool,
    pub request_timeout_secs: u64,
    pub cors_origin: Option<String>,
    pub whatsapp_number: String,
    pub jwt: JwtConfig,
    pub google: GoogleConfig,
    pub smtp: SmtpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "storefront"),
            audience: env_or("JWT_AUDIENCE", "storefront-users"),
        };
        let google = GoogleConfig {
            client_id: env_or("GOOGLE_CLIENT_ID", ""),
            certs_url: env_or("GOOGLE_CERTS_URL", DEFAULT_GOOGLE_CERTS_URL),
        };
        let smtp = SmtpConfig {
            host: env_or("SMTP_HOST", "localhost"),
            port: parsed_env("SMTP_PORT").unwrap_or(587),
            username: env_or("SMTP_USERNAME", ""),
            password: env_or("SMTP_PASSWORD", ""),
            from: env_or("MAIL_FROM", "no-reply@localhost"),
        };
        let cookie_secure = secure_cookies(
            std::env::var("APP_ENV").ok().as_deref(),
            std::env::var("COOKIE_SECURE").ok().as_deref(),
        );

        Ok(Self {
            database_url,
            cookie_secure,
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS").unwrap_or(15),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            whatsapp_number: env_or("WHATSAPP_NUMBER", ""),
            jwt,
            google,
            smtp,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// An explicit `COOKIE_SECURE` wins; otherwise production-like environments get secure cookies.
fn secure_cookies(app_env: Option<&str>, explicit: Option<&str>) -> bool {
    if let Some(v) = explicit {
        return matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
    matches!(
        app_env.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("production" | "prod" | "staging")
    )
}

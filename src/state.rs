use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::google::{GoogleVerifier, IdentityVerifier},
    config::AppConfig,
    email::mailer::{Mailer, SmtpMailer},
    orders::repo::{OrderStore, PgOrderStore},
    reviews::repo::{PgReviewStore, ReviewStore},
    theme::repo::{PgThemeStore, ThemeStore},
    users::repo::{PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub orders: Arc<dyn OrderStore>,
    pub theme: Arc<dyn ThemeStore>,
    pub mailer: Arc<dyn Mailer>,
    pub identity: Arc<dyn IdentityVerifier>,
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

impl AppState {
    /// Postgres-backed stores sharing one pool, SMTP mail and Google sign-in.
    pub fn postgres(config: Arc<AppConfig>, db: PgPool) -> anyhow::Result<Self> {
        let mailer = SmtpMailer::new(&config.smtp).context("configure SMTP transport")?;
        let identity = GoogleVerifier::new(&config.google);

        Ok(Self {
            users: Arc::new(PgUserStore::new(db.clone())),
            reviews: Arc::new(PgReviewStore::new(db.clone())),
            orders: Arc::new(PgOrderStore::new(db.clone())),
            theme: Arc::new(PgThemeStore::new(db)),
            mailer: Arc::new(mailer),
            identity: Arc::new(identity),
            config,
        })
    }
}

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Storefront palette: primary, secondary, text and background colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Theme {
    pub pr: String,
    pub se: String,
    pub tx: String,
    pub bg: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pr: "#2563eb".into(),
            se: "#f59e0b".into(),
            tx: "#111827".into(),
            bg: "#ffffff".into(),
        }
    }
}

#[async_trait]
pub trait ThemeStore: Send + Sync {
    async fn get(&self) -> anyhow::Result<Option<Theme>>;
    async fn set(&self, theme: &Theme) -> anyhow::Result<Theme>;
}

#[derive(Clone)]
pub struct PgThemeStore {
    db: PgPool,
}

impl PgThemeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ThemeStore for PgThemeStore {
    async fn get(&self) -> anyhow::Result<Option<Theme>> {
        let theme = sqlx::query_as::<_, Theme>(
            "SELECT pr, se, tx, bg FROM theme_settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await
        .context("load theme")?;
        Ok(theme)
    }

    async fn set(&self, theme: &Theme) -> anyhow::Result<Theme> {
        let stored = sqlx::query_as::<_, Theme>(
            r#"
            INSERT INTO theme_settings (id, pr, se, tx, bg)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
               SET pr = EXCLUDED.pr,
                   se = EXCLUDED.se,
                   tx = EXCLUDED.tx,
                   bg = EXCLUDED.bg,
                   updated_at = now()
            RETURNING pr, se, tx, bg
            "#,
        )
        .bind(&theme.pr)
        .bind(&theme.se)
        .bind(&theme.tx)
        .bind(&theme.bg)
        .fetch_one(&self.db)
        .await
        .context("store theme")?;
        Ok(stored)
    }
}

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::repo_types::{NewUser, User, UserChanges, UserListItem};
use crate::pagination::{Page, PageRequest};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("email or phone already in use")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Matches `identifier` against email or phone.
    async fn find_by_identifier(&self, identifier: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn create(&self, new: NewUser) -> Result<User, UserStoreError>;
    /// Returns the user owning `email`, inserting one in the same statement if none exists.
    async fn upsert_by_email(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, UserStoreError>;
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, UserStoreError>;
    /// Newest first; search matches name, email or phone.
    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<UserListItem>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn store_error(e: sqlx::Error, what: &'static str) -> UserStoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return UserStoreError::Duplicate;
        }
    }
    UserStoreError::Other(anyhow::Error::new(e).context(what))
}

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, created_at, updated_at";

const USER_FILTER: &str = r#"
    ($1::text IS NULL
     OR u.name ILIKE $1
     OR u.email ILIKE $1
     OR u.phone ILIKE $1)
"#;

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR phone = $1 ORDER BY id LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.db)
        .await
        .context("find user by identifier")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> Result<User, UserStoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, phone, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| store_error(e, "insert user"))?;
        Ok(user)
    }

    async fn upsert_by_email(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, UserStoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| store_error(e, "upsert user by email"))?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone),
                   updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| store_error(e, "update user"))?;
        Ok(user)
    }

    async fn list(&self, req: &PageRequest) -> anyhow::Result<Page<UserListItem>> {
        let pattern = req.like_pattern();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM users u WHERE {USER_FILTER}"
        ))
        .bind(&pattern)
        .fetch_one(&self.db)
        .await
        .context("count users")?;

        let items = sqlx::query_as::<_, UserListItem>(&format!(
            r#"
            SELECT u.id, u.name, u.email, u.phone, u.created_at, u.updated_at,
                   (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count,
                   (SELECT COUNT(*) FROM cart_items c WHERE c.user_id = u.id) AS cart_item_count
              FROM users u
             WHERE {USER_FILTER}
             ORDER BY u.created_at DESC, u.id DESC
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(req.limit)
        .bind(req.offset())
        .fetch_all(&self.db)
        .await
        .context("list users")?;

        Ok(Page::new(items, total, req))
    }
}

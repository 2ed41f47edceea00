use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::models::{Holding, HoldingChanges, NewHolding, NewUser, User};
use crate::database::repository::{HoldingRepository, StoreError, UserRepository};

const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS holdings (
        seq        BIGSERIAL,
        id         UUID PRIMARY KEY,
        user_id    UUID NOT NULL REFERENCES users (id),
        name       TEXT NOT NULL,
        ticker     TEXT NOT NULL,
        quantity   DOUBLE PRECISION NOT NULL CHECK (quantity >= 0),
        buy_price  DOUBLE PRECISION NOT NULL CHECK (buy_price >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS holdings_user_id_seq_idx ON holdings (user_id, seq)",
];

const HOLDING_COLUMNS: &str =
    "id, name, ticker, quantity, buy_price, user_id, created_at, updated_at";

/// Postgres-backed credential and holdings store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Sqlx(e)
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl HoldingRepository for PgStore {
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Holding>, StoreError> {
        let sql = format!(
            "SELECT {} FROM holdings WHERE user_id = $1 ORDER BY seq",
            HOLDING_COLUMNS
        );
        let holdings = sqlx::query_as::<_, Holding>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(holdings)
    }

    async fn find_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Holding>, StoreError> {
        let sql = format!(
            "SELECT {} FROM holdings WHERE id = $1 AND user_id = $2",
            HOLDING_COLUMNS
        );
        let holding = sqlx::query_as::<_, Holding>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(holding)
    }

    async fn create(&self, owner_id: Uuid, new_holding: NewHolding) -> Result<Holding, StoreError> {
        let sql = format!(
            "INSERT INTO holdings (id, user_id, name, ticker, quantity, buy_price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            HOLDING_COLUMNS
        );
        let holding = sqlx::query_as::<_, Holding>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&new_holding.name)
            .bind(&new_holding.ticker)
            .bind(new_holding.quantity)
            .bind(new_holding.buy_price)
            .fetch_one(&self.pool)
            .await?;
        Ok(holding)
    }

    async fn update_for_owner(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: HoldingChanges,
    ) -> Result<Option<Holding>, StoreError> {
        let sql = format!(
            "UPDATE holdings SET
                 name = COALESCE($3, name),
                 ticker = COALESCE($4, ticker),
                 quantity = COALESCE($5, quantity),
                 buy_price = COALESCE($6, buy_price),
                 updated_at = $7
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            HOLDING_COLUMNS
        );
        let holding = sqlx::query_as::<_, Holding>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(changes.name)
            .bind(changes.ticker)
            .bind(changes.quantity)
            .bind(changes.buy_price)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(holding)
    }

    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM holdings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Trainer account repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Trainer record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainerRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trainer repository for database operations
pub struct TrainerRepository;

impl TrainerRepository {
    /// Create a new trainer account
    pub async fn create(pool: &PgPool, email: &str, password_hash: &str) -> Result<TrainerRecord> {
        let trainer = sqlx::query_as::<_, TrainerRecord>(
            r#"
            INSERT INTO trainers (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(trainer)
    }

    /// Find trainer by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<TrainerRecord>> {
        let trainer = sqlx::query_as::<_, TrainerRecord>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM trainers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(trainer)
    }

    /// Find trainer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TrainerRecord>> {
        let trainer = sqlx::query_as::<_, TrainerRecord>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM trainers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(trainer)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM trainers WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }
}

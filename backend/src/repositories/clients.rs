//! Client registry and plan history repository
//!
//! The client row carries the *current* plan cycle inline; superseded
//! cycles live in the append-only `plan_history` table. The two write
//! paths that touch both (`assign_plan`, `renew_plan`) run inside a SQL
//! transaction, history insert first.

use crate::repositories::transactions::{CreateTransaction, TransactionRepository};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use trainerdesk_shared::models::{Client, PlanCycle, PlanHistoryEntry};
use uuid::Uuid;

/// Client record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRecord {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub target_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
    pub plan_name: Option<String>,
    pub plan_value: Option<Decimal>,
    pub duration_months: Option<i32>,
    pub plan_start_date: Option<NaiveDate>,
    pub plan_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Convert to the domain model, validating the stored plan fields
    pub fn into_model(self) -> Result<Client> {
        let status = self
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let plan = match (
            self.plan_name,
            self.plan_value,
            self.duration_months,
            self.plan_start_date,
            self.plan_end_date,
        ) {
            (Some(name), Some(value), Some(duration_months), Some(start_date), Some(end_date)) => {
                Some(PlanCycle {
                    name,
                    value,
                    duration_months,
                    start_date,
                    end_date,
                })
            }
            (None, None, None, None, None) => None,
            _ => anyhow::bail!("Inconsistent plan fields for client {}", self.id),
        };

        Ok(Client {
            id: self.id,
            trainer_id: self.trainer_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status,
            weight_kg: self.weight_kg.and_then(|d| d.to_f64()),
            height_cm: self.height_cm.and_then(|d| d.to_f64()),
            target_weight_kg: self.target_weight_kg.and_then(|d| d.to_f64()),
            notes: self.notes,
            plan,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Plan history record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanHistoryRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan_name: String,
    pub plan_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_status: String,
    pub recorded_at: DateTime<Utc>,
}

impl PlanHistoryRecord {
    pub fn into_model(self) -> Result<PlanHistoryEntry> {
        Ok(PlanHistoryEntry {
            id: self.id,
            client_id: self.client_id,
            plan_name: self.plan_name,
            plan_value: self.plan_value,
            start_date: self.start_date,
            end_date: self.end_date,
            payment_status: self
                .payment_status
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
            recorded_at: self.recorded_at,
        })
    }
}

/// Input for creating a client
#[derive(Debug, Clone)]
pub struct CreateClient {
    pub trainer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Input for partial client updates; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateClientFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// The five plan columns written together on assignment and renewal
#[derive(Debug, Clone)]
pub struct PlanCycleFields {
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Snapshot appended to plan_history before a renewal overwrites the
/// current cycle
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub plan_name: String,
    pub plan_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_status: String,
}

const CLIENT_COLUMNS: &str = "id, trainer_id, name, email, phone, status, weight_kg, height_cm, \
     target_weight_kg, notes, plan_name, plan_value, duration_months, plan_start_date, \
     plan_end_date, created_at, updated_at";

/// Client repository for database operations
pub struct ClientRepository;

impl ClientRepository {
    /// Create a new client without a plan
    pub async fn create(pool: &PgPool, input: CreateClient) -> Result<ClientRecord> {
        let record = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            INSERT INTO clients (trainer_id, name, email, phone, weight_kg, height_cm, target_weight_kg, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(input.trainer_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.weight_kg)
        .bind(input.height_cm)
        .bind(input.target_weight_kg)
        .bind(&input.notes)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List clients for a trainer, optionally filtered by status
    pub async fn list(
        pool: &PgPool,
        trainer_id: Uuid,
        status: Option<&str>,
    ) -> Result<Vec<ClientRecord>> {
        let records = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE trainer_id = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY name
            "#,
        ))
        .bind(trainer_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get a client by ID, scoped to the trainer
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
    ) -> Result<Option<ClientRecord>> {
        let record = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE id = $1 AND trainer_id = $2
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Update client fields; plan columns are never touched here
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
        updates: UpdateClientFields,
    ) -> Result<Option<ClientRecord>> {
        let record = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            UPDATE clients SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status),
                weight_kg = COALESCE($7, weight_kg),
                height_cm = COALESCE($8, height_cm),
                target_weight_kg = COALESCE($9, target_weight_kg),
                notes = COALESCE($10, notes),
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(updates.name)
        .bind(updates.email)
        .bind(updates.phone)
        .bind(updates.status)
        .bind(updates.weight_kg)
        .bind(updates.height_cm)
        .bind(updates.target_weight_kg)
        .bind(updates.notes)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Hard-delete a client (explicit admin action; archive is a status
    /// flip via `update`)
    pub async fn delete(pool: &PgPool, id: Uuid, trainer_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM clients
            WHERE id = $1 AND trainer_id = $2
            "#,
        )
        .bind(id)
        .bind(trainer_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the current plan cycle and create its pending charge.
    ///
    /// First assignment (or explicit replacement) archives nothing;
    /// only `renew_plan` snapshots to history. Both writes commit
    /// together or not at all.
    pub async fn assign_plan(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
        cycle: PlanCycleFields,
        charge_description: String,
    ) -> Result<Option<ClientRecord>> {
        let mut tx = pool.begin().await?;

        let record = Self::write_plan_columns(&mut tx, id, trainer_id, &cycle).await?;
        let Some(record) = record else {
            return Ok(None);
        };

        TransactionRepository::insert(
            &mut *tx,
            CreateTransaction {
                trainer_id,
                client_id: id,
                plan_name: Some(cycle.name.clone()),
                amount: cycle.value,
                due_date: cycle.start_date,
                status: "pending".to_string(),
                description: Some(charge_description),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    /// Renew the plan: append the superseded cycle to history, then
    /// overwrite the current cycle, then create the new pending charge.
    pub async fn renew_plan(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
        history: NewHistoryEntry,
        cycle: PlanCycleFields,
        charge_description: String,
    ) -> Result<Option<ClientRecord>> {
        let mut tx = pool.begin().await?;

        // Snapshot before the overwrite
        sqlx::query(
            r#"
            INSERT INTO plan_history (client_id, plan_name, plan_value, start_date, end_date, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&history.plan_name)
        .bind(history.plan_value)
        .bind(history.start_date)
        .bind(history.end_date)
        .bind(&history.payment_status)
        .execute(&mut *tx)
        .await?;

        let record = Self::write_plan_columns(&mut tx, id, trainer_id, &cycle).await?;
        let Some(record) = record else {
            return Ok(None);
        };

        TransactionRepository::insert(
            &mut *tx,
            CreateTransaction {
                trainer_id,
                client_id: id,
                plan_name: Some(cycle.name.clone()),
                amount: cycle.value,
                due_date: cycle.start_date,
                status: "pending".to_string(),
                description: Some(charge_description),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn write_plan_columns(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
        trainer_id: Uuid,
        cycle: &PlanCycleFields,
    ) -> Result<Option<ClientRecord>> {
        let record = sqlx::query_as::<_, ClientRecord>(&format!(
            r#"
            UPDATE clients SET
                plan_name = $3,
                plan_value = $4,
                duration_months = $5,
                plan_start_date = $6,
                plan_end_date = $7,
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(&cycle.name)
        .bind(cycle.value)
        .bind(cycle.duration_months)
        .bind(cycle.start_date)
        .bind(cycle.end_date)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(record)
    }

    /// Plan history for a client, oldest first
    pub async fn plan_history(pool: &PgPool, client_id: Uuid) -> Result<Vec<PlanHistoryRecord>> {
        let records = sqlx::query_as::<_, PlanHistoryRecord>(
            r#"
            SELECT id, client_id, plan_name, plan_value, start_date, end_date, payment_status, recorded_at
            FROM plan_history
            WHERE client_id = $1
            ORDER BY recorded_at
            "#,
        )
        .bind(client_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

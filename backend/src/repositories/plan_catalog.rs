use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use trainerdesk_shared::models::PlanTemplate;
use uuid::Uuid;

/// Plan template record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanTemplateRecord {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanTemplateRecord {
    pub fn into_model(self) -> PlanTemplate {
        PlanTemplate {
            id: self.id,
            trainer_id: self.trainer_id,
            name: self.name,
            value: self.value,
            duration_months: self.duration_months,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a plan template
#[derive(Debug, Clone)]
pub struct CreatePlanTemplate {
    pub trainer_id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
}

/// Input for partial template updates
#[derive(Debug, Clone, Default)]
pub struct UpdatePlanTemplateFields {
    pub name: Option<String>,
    pub value: Option<Decimal>,
    pub duration_months: Option<i32>,
}

const TEMPLATE_COLUMNS: &str =
    "id, trainer_id, name, value, duration_months, created_at, updated_at";

/// Plan template repository for database operations
pub struct PlanCatalogRepository;

impl PlanCatalogRepository {
    /// Create a template; name is unique per trainer
    pub async fn create(pool: &PgPool, input: CreatePlanTemplate) -> Result<PlanTemplateRecord> {
        let record = sqlx::query_as::<_, PlanTemplateRecord>(&format!(
            r#"
            INSERT INTO plan_templates (trainer_id, name, value, duration_months)
            VALUES ($1, $2, $3, $4)
            RETURNING {TEMPLATE_COLUMNS}
            "#,
        ))
        .bind(input.trainer_id)
        .bind(&input.name)
        .bind(input.value)
        .bind(input.duration_months)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List templates for a trainer, alphabetically
    pub async fn list(pool: &PgPool, trainer_id: Uuid) -> Result<Vec<PlanTemplateRecord>> {
        let records = sqlx::query_as::<_, PlanTemplateRecord>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM plan_templates
            WHERE trainer_id = $1
            ORDER BY name
            "#,
        ))
        .bind(trainer_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get a template by ID, scoped to the trainer
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
    ) -> Result<Option<PlanTemplateRecord>> {
        let record = sqlx::query_as::<_, PlanTemplateRecord>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM plan_templates
            WHERE id = $1 AND trainer_id = $2
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Update template fields. Assigned cycles keep their snapshot;
    /// edits here only affect future assignments.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
        updates: UpdatePlanTemplateFields,
    ) -> Result<Option<PlanTemplateRecord>> {
        let record = sqlx::query_as::<_, PlanTemplateRecord>(&format!(
            r#"
            UPDATE plan_templates SET
                name = COALESCE($3, name),
                value = COALESCE($4, value),
                duration_months = COALESCE($5, duration_months),
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {TEMPLATE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(updates.name)
        .bind(updates.value)
        .bind(updates.duration_months)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a template. Does not touch clients already on a cycle
    /// assigned from it.
    pub async fn delete(pool: &PgPool, id: Uuid, trainer_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM plan_templates
            WHERE id = $1 AND trainer_id = $2
            "#,
        )
        .bind(id)
        .bind(trainer_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

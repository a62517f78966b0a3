//! Plan catalog service
//!
//! Templates are copied onto clients at assignment time, so catalog
//! edits and deletions never touch running cycles.

use crate::error::ApiError;
use crate::repositories::{
    CreatePlanTemplate, PlanCatalogRepository, PlanTemplateRecord, UpdatePlanTemplateFields,
};
use sqlx::PgPool;
use trainerdesk_shared::types::{
    CreatePlanTemplateRequest, PlanTemplateResponse, UpdatePlanTemplateRequest,
};
use trainerdesk_shared::validation;
use uuid::Uuid;

/// Plan catalog service
pub struct PlanCatalogService;

impl PlanCatalogService {
    /// Create a template; the name must be unique per trainer
    pub async fn create_template(
        pool: &PgPool,
        trainer_id: Uuid,
        request: CreatePlanTemplateRequest,
    ) -> Result<PlanTemplateResponse, ApiError> {
        validation::validate_name(&request.name).map_err(ApiError::Validation)?;
        validation::validate_amount(request.value).map_err(ApiError::Validation)?;
        validation::validate_duration_months(request.duration_months)
            .map_err(ApiError::Validation)?;

        let record = PlanCatalogRepository::create(
            pool,
            CreatePlanTemplate {
                trainer_id,
                name: request.name,
                value: request.value,
                duration_months: request.duration_months,
            },
        )
        .await
        .map_err(|e| match e.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                ApiError::Conflict("A plan template with this name already exists".to_string())
            }
            _ => ApiError::Internal(e),
        })?;

        Ok(Self::to_response(record))
    }

    /// List the trainer's templates
    pub async fn list_templates(
        pool: &PgPool,
        trainer_id: Uuid,
    ) -> Result<Vec<PlanTemplateResponse>, ApiError> {
        let records = PlanCatalogRepository::list(pool, trainer_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::to_response).collect())
    }

    /// Get a single template
    pub async fn get_template(
        pool: &PgPool,
        trainer_id: Uuid,
        template_id: Uuid,
    ) -> Result<PlanTemplateResponse, ApiError> {
        let record = PlanCatalogRepository::find_by_id(pool, template_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Plan template not found".to_string()))?;

        Ok(Self::to_response(record))
    }

    /// Partial update; only future assignments see the new terms
    pub async fn update_template(
        pool: &PgPool,
        trainer_id: Uuid,
        template_id: Uuid,
        request: UpdatePlanTemplateRequest,
    ) -> Result<PlanTemplateResponse, ApiError> {
        if let Some(name) = &request.name {
            validation::validate_name(name).map_err(ApiError::Validation)?;
        }
        if let Some(value) = request.value {
            validation::validate_amount(value).map_err(ApiError::Validation)?;
        }
        if let Some(duration) = request.duration_months {
            validation::validate_duration_months(duration).map_err(ApiError::Validation)?;
        }

        let record = PlanCatalogRepository::update(
            pool,
            template_id,
            trainer_id,
            UpdatePlanTemplateFields {
                name: request.name,
                value: request.value,
                duration_months: request.duration_months,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Plan template not found".to_string()))?;

        Ok(Self::to_response(record))
    }

    /// Delete a template
    pub async fn delete_template(
        pool: &PgPool,
        trainer_id: Uuid,
        template_id: Uuid,
    ) -> Result<(), ApiError> {
        let deleted = PlanCatalogRepository::delete(pool, template_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Plan template not found".to_string()));
        }
        Ok(())
    }

    fn to_response(record: PlanTemplateRecord) -> PlanTemplateResponse {
        PlanTemplateResponse {
            id: record.id.to_string(),
            name: record.name,
            value: record.value,
            duration_months: record.duration_months,
            created_at: record.created_at,
        }
    }
}

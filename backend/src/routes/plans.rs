//! Plan catalog routes

use crate::auth::AuthTrainer;
use crate::error::ApiResult;
use crate::services::PlanCatalogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use trainerdesk_shared::types::{
    CreatePlanTemplateRequest, PlanTemplateResponse, UpdatePlanTemplateRequest,
};
use uuid::Uuid;

/// Create plan catalog routes
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_template).get(list_templates))
        .route(
            "/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
}

/// POST /api/v1/plans - Create a plan template
async fn create_template(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Json(req): Json<CreatePlanTemplateRequest>,
) -> ApiResult<(StatusCode, Json<PlanTemplateResponse>)> {
    let template = PlanCatalogService::create_template(&state.db, auth.trainer_id, req).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/plans - List plan templates
async fn list_templates(
    State(state): State<AppState>,
    auth: AuthTrainer,
) -> ApiResult<Json<Vec<PlanTemplateResponse>>> {
    let templates = PlanCatalogService::list_templates(&state.db, auth.trainer_id).await?;
    Ok(Json(templates))
}

/// GET /api/v1/plans/:id - Get a plan template
async fn get_template(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlanTemplateResponse>> {
    let template = PlanCatalogService::get_template(&state.db, auth.trainer_id, id).await?;
    Ok(Json(template))
}

/// PUT /api/v1/plans/:id - Update a plan template
async fn update_template(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlanTemplateRequest>,
) -> ApiResult<Json<PlanTemplateResponse>> {
    let template =
        PlanCatalogService::update_template(&state.db, auth.trainer_id, id, req).await?;
    Ok(Json(template))
}

/// DELETE /api/v1/plans/:id - Delete a plan template
async fn delete_template(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    PlanCatalogService::delete_template(&state.db, auth.trainer_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

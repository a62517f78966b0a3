//! Client registry and plan lifecycle routes
//!
//! Every handler resolves "today" once from the wall clock and threads
//! it through the services, which keeps status derivation testable with
//! fixed dates.

use crate::auth::AuthTrainer;
use crate::error::ApiResult;
use crate::services::{ClientService, PlanService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use trainerdesk_shared::types::{
    AssignPlanRequest, ClientListQuery, ClientResponse, CreateClientRequest,
    PlanHistoryEntryResponse, PlanStatusResponse, RenewPlanRequest, SelfRegisterClientRequest,
    UpdateClientRequest,
};
use uuid::Uuid;

/// Create client routes
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/:id/plan", post(assign_plan))
        .route("/:id/plan/renew", post(renew_plan))
        .route("/:id/plan/status", get(plan_status))
        .route("/:id/plan/history", get(plan_history))
}

/// Public self-registration routes; mounted outside the auth extractor
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/register/:trainer_id", post(self_register))
}

/// POST /api/v1/clients - Create a client
async fn create_client(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Json(req): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientResponse>)> {
    let today = Utc::now().date_naive();
    let client = ClientService::create_client(&state.db, auth.trainer_id, req, today).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// POST /api/v1/public/register/:trainer_id - Client self-registration
///
/// No authentication: prospective clients fill a signup link the
/// trainer shares. Only the reduced field set is accepted.
async fn self_register(
    State(state): State<AppState>,
    Path(trainer_id): Path<Uuid>,
    Json(req): Json<SelfRegisterClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientResponse>)> {
    let today = Utc::now().date_naive();
    let client = ClientService::self_register(&state.db, trainer_id, req, today).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients - List clients, optionally filtered by status
async fn list_clients(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Query(query): Query<ClientListQuery>,
) -> ApiResult<Json<Vec<ClientResponse>>> {
    let today = Utc::now().date_naive();
    let clients =
        ClientService::list_clients(&state.db, auth.trainer_id, query.status, today).await?;
    Ok(Json(clients))
}

/// GET /api/v1/clients/:id - Get a client
async fn get_client(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClientResponse>> {
    let today = Utc::now().date_naive();
    let client = ClientService::get_client(&state.db, auth.trainer_id, id, today).await?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/:id - Partial update (archive via status)
async fn update_client(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClientRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let today = Utc::now().date_naive();
    let client = ClientService::update_client(&state.db, auth.trainer_id, id, req, today).await?;
    Ok(Json(client))
}

/// DELETE /api/v1/clients/:id - Hard-delete a client
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ClientService::delete_client(&state.db, auth.trainer_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/clients/:id/plan - Assign a plan cycle
async fn assign_plan(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignPlanRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let today = Utc::now().date_naive();
    let client = PlanService::assign_plan(&state.db, auth.trainer_id, id, req, today).await?;
    Ok(Json(client))
}

/// POST /api/v1/clients/:id/plan/renew - Renew the current plan
async fn renew_plan(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
    Json(req): Json<RenewPlanRequest>,
) -> ApiResult<Json<ClientResponse>> {
    let today = Utc::now().date_naive();
    let client = PlanService::renew_plan(&state.db, auth.trainer_id, id, req, today).await?;
    Ok(Json(client))
}

/// GET /api/v1/clients/:id/plan/status - Derived plan status
async fn plan_status(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlanStatusResponse>> {
    let today = Utc::now().date_naive();
    let status = PlanService::plan_status(&state.db, auth.trainer_id, id, today).await?;
    Ok(Json(status))
}

/// GET /api/v1/clients/:id/plan/history - Archived plan cycles
async fn plan_history(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<PlanHistoryEntryResponse>>> {
    let history = PlanService::plan_history(&state.db, auth.trainer_id, id).await?;
    Ok(Json(history))
}

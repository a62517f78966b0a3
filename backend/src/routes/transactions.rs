//! Financial ledger routes

use crate::auth::AuthTrainer;
use crate::error::ApiResult;
use crate::services::LedgerService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use chrono::Utc;
use trainerdesk_shared::types::{
    CreateTransactionRequest, TransactionListQuery, TransactionResponse, UpdateDueDateRequest,
};
use uuid::Uuid;

/// Create transaction routes
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_transaction).get(list_transactions))
        .route("/:id/pay", post(mark_paid))
        .route("/:id/due-date", put(update_due_date))
        .route("/:id/cancel", post(cancel))
}

/// POST /api/v1/transactions - Create a one-off transaction
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Json(req): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let today = Utc::now().date_naive();
    let tx = LedgerService::create_transaction(&state.db, auth.trainer_id, req, today).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/v1/transactions - List under the report filter policy
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let today = Utc::now().date_naive();
    let txs = LedgerService::list_transactions(&state.db, auth.trainer_id, query, today).await?;
    Ok(Json(txs))
}

/// POST /api/v1/transactions/:id/pay - Mark paid (idempotent)
async fn mark_paid(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TransactionResponse>> {
    let today = Utc::now().date_naive();
    let tx = LedgerService::mark_paid(&state.db, auth.trainer_id, id, today).await?;
    Ok(Json(tx))
}

/// PUT /api/v1/transactions/:id/due-date - Move the due date
async fn update_due_date(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDueDateRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    let today = Utc::now().date_naive();
    let tx =
        LedgerService::update_due_date(&state.db, auth.trainer_id, id, req.due_date, today).await?;
    Ok(Json(tx))
}

/// POST /api/v1/transactions/:id/cancel - Cancel a transaction
async fn cancel(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TransactionResponse>> {
    let today = Utc::now().date_naive();
    let tx = LedgerService::cancel(&state.db, auth.trainer_id, id, today).await?;
    Ok(Json(tx))
}

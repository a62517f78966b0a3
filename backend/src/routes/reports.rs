//! Financial report routes

use crate::auth::AuthTrainer;
use crate::error::ApiResult;
use crate::services::LedgerService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use trainerdesk_shared::types::{MetricsQuery, MetricsResponse};

/// Create report routes
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}

/// GET /api/v1/reports/metrics - Aggregate financial metrics
async fn metrics(
    State(state): State<AppState>,
    auth: AuthTrainer,
    Query(query): Query<MetricsQuery>,
) -> ApiResult<Json<MetricsResponse>> {
    let today = Utc::now().date_naive();
    let report = LedgerService::metrics(&state.db, auth.trainer_id, query, today).await?;
    Ok(Json(report))
}

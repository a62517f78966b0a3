//! API request and response types

use crate::finance::{FinanceMetrics, StatusFilter};
use crate::models::{ClientStatus, PlanCycle, PlanStatus, TransactionStatus};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Authentication
// ============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Trainer registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Trainer profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Clients
// ============================================================================

/// Client creation request (staff-entered)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Public self-registration request (reduced field set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfRegisterClientRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial client update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Client list query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientListQuery {
    /// Filter by lifecycle status; absent means all
    pub status: Option<ClientStatus>,
}

/// Client response, with the plan status derived at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: ClientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanCycle>,
    pub plan_status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Plan catalog
// ============================================================================

/// Plan template creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanTemplateRequest {
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
}

/// Partial plan template update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlanTemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i32>,
}

/// Plan template response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplateResponse {
    pub id: String,
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Plan lifecycle
// ============================================================================

/// Plan assignment request
///
/// Either `template_id` (copy name/value/duration from the catalog) or
/// the full custom triple (`name`, `value`, `duration_months`) must be
/// supplied, never a mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i32>,
    /// Defaults to today when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Plan renewal request
///
/// With `keep_conditions`, the current cycle's value and duration carry
/// over; otherwise `value` and `duration_months` are required and the
/// plan name is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewPlanRequest {
    pub keep_conditions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i32>,
    /// Defaults to today when absent; continuity with the previous cycle
    /// is not enforced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Derived plan status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStatusResponse {
    pub status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanCycle>,
    /// Days until the cycle ends; absent without a plan, negative when
    /// already expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

/// One archived plan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanHistoryEntryResponse {
    pub id: String,
    pub plan_name: String,
    pub plan_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_status: String,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Financial ledger
// ============================================================================

/// Manual transaction creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub client_id: Uuid,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Due date edit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDueDateRequest {
    pub due_date: NaiveDate,
}

/// Transaction list query (report filter policy)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub status: StatusFilter,
    /// Exact plan name; absent means all plans
    pub plan: Option<String>,
    pub client_id: Option<Uuid>,
}

/// Transaction response carrying both the stored and the derived status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: TransactionStatus,
    pub effective_status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Reports
// ============================================================================

/// Metrics report query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub plan: Option<String>,
}

/// Metrics report response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub metrics: FinanceMetrics,
}

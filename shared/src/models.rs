//! Data models for the TrainerDesk application

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Client lifecycle status
///
/// Clients are archived by flipping to `inactive`, never hard-deleted
/// implicitly. Hard delete is a separate explicit action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            other => Err(format!("Unknown client status: {}", other)),
        }
    }
}

/// Derived state of a client's current plan cycle
///
/// This is never stored; it is computed from the plan end date and the
/// current date at read time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    NoPlan,
    Active,
    ExpiringSoon,
    Expired,
}

/// Stored status of a ledger transaction
///
/// `Overdue` can be stored by explicit action, but a pending transaction
/// past its due date is also *effectively* overdue at read time. The two
/// must not be conflated; see [`crate::finance::effective_status`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Overdue => "overdue",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(TransactionStatus::Paid),
            "pending" => Ok(TransactionStatus::Pending),
            "overdue" => Ok(TransactionStatus::Overdue),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}

/// Payment outcome snapshotted into plan history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// Trainer account
///
/// Every other record is scoped by `trainer_id`; one trainer is one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One billing cycle assigned to a client
///
/// Invariant: `end_date` is always `start_date` plus `duration_months`
/// calendar months.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanCycle {
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Client (student) record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub notes: Option<String>,
    /// Current plan cycle, if one has been assigned
    pub plan: Option<PlanCycle>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Whether the client counts toward recurring-revenue metrics
    pub fn is_billable(&self) -> bool {
        self.status == ClientStatus::Active && self.plan.is_some()
    }
}

/// Catalog entry copied onto a client when a plan is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub duration_months: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only snapshot of a superseded plan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanHistoryEntry {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan_name: String,
    pub plan_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub recorded_at: DateTime<Utc>,
}

/// Billing record tied to a client and (optionally) a plan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub plan_name: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

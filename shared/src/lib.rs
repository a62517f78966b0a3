//! TrainerDesk Shared Library
//!
//! Domain models, API types, validation, and the pure rule logic for the
//! plan/subscription lifecycle and financial ledger. Everything here is
//! side-effect free; the backend crate owns persistence and HTTP.

pub mod finance;
pub mod models;
pub mod plan_cycle;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use finance::{compute_metrics, effective_status, FinanceMetrics, LedgerFilter, StatusFilter};
pub use models::{
    Client, ClientStatus, PaymentStatus, PlanCycle, PlanHistoryEntry, PlanStatus, PlanTemplate,
    Trainer, Transaction, TransactionStatus,
};
pub use plan_cycle::{cycle_end_date, plan_status, EXPIRING_SOON_WINDOW_DAYS};

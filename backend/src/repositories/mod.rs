pub mod clients;
pub mod plan_catalog;
pub mod trainers;
pub mod transactions;

pub use clients::{
    ClientRecord, ClientRepository, CreateClient, NewHistoryEntry, PlanCycleFields,
    PlanHistoryRecord, UpdateClientFields,
};
pub use plan_catalog::{
    CreatePlanTemplate, PlanCatalogRepository, PlanTemplateRecord, UpdatePlanTemplateFields,
};
pub use trainers::{TrainerRecord, TrainerRepository};
pub use transactions::{CreateTransaction, TransactionRecord, TransactionRepository};

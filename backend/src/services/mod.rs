pub mod clients;
pub mod ledger;
pub mod plan_catalog;
pub mod plans;
pub mod trainers;

pub use clients::ClientService;
pub use ledger::LedgerService;
pub use plan_catalog::PlanCatalogService;
pub use plans::PlanService;
pub use trainers::TrainerService;

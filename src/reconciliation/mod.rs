pub mod reconciliation_model;
pub mod reconciliation_repository;
pub mod reconciliation_service;
pub mod reconciliation_traits;

pub use reconciliation_model::{is_reset_due, TransferReport};
pub use reconciliation_repository::MonthlyResetRepository;
pub use reconciliation_service::MonthlyResetService;
pub use reconciliation_traits::{MonthlyResetRepositoryTrait, MonthlyResetServiceTrait};

pub mod advisor_model;
pub mod advisor_service;

pub use advisor_model::{AdvisorAction, AdvisorOutcome, FinancialContext};
pub use advisor_service::AdvisorDispatcher;

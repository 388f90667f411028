pub mod ledger_model;
pub mod ledger_repository;
pub mod ledger_service;
pub mod ledger_traits;

pub use ledger_model::{
    NewTransaction, Period, Transaction, TransactionDB, TransactionType, TransactionUpdate,
    TransactionWithBudget, TRANSACTION_TYPE_EXPENSE, TRANSACTION_TYPE_INCOME,
};
pub use ledger_repository::TransactionRepository;
pub use ledger_service::{monthly_income, spent_by_budget, LedgerService};
pub use ledger_traits::{LedgerServiceTrait, TransactionRepositoryTrait};

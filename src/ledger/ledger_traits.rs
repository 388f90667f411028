use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::ledger::ledger_model::{
    NewTransaction, Period, Transaction, TransactionUpdate, TransactionWithBudget,
};
use crate::session::SessionContext;

/// Trait for transaction repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_transaction(&self, owner: &str, txn_id: &str) -> Result<Transaction>;
    fn get_transactions(&self, owner: &str) -> Result<Vec<Transaction>>;
    fn get_transactions_in_period(&self, owner: &str, period: &Period) -> Result<Vec<Transaction>>;
    async fn create_transaction(
        &self,
        owner: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        owner: &str,
        txn_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, owner: &str, txn_id: &str) -> Result<Transaction>;
}

/// Trait for ledger service operations
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Sum of income transactions in the current calendar month of the
    /// session timezone.
    fn monthly_income_for(&self, ctx: &SessionContext) -> Result<Decimal>;
    fn get_transactions(&self, ctx: &SessionContext) -> Result<Vec<Transaction>>;
    fn get_transactions_with_budgets(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<TransactionWithBudget>>;
    async fn create_transaction(
        &self,
        ctx: &SessionContext,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        ctx: &SessionContext,
        txn_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, ctx: &SessionContext, txn_id: &str) -> Result<Transaction>;
}

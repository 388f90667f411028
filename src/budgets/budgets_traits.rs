use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::budgets::allocation::{AllocationCheck, BudgetTotals};
use crate::budgets::budgets_model::{Budget, BudgetUpdate, BudgetWithGoal, NewBudget};
use crate::errors::Result;
use crate::session::SessionContext;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn get_budgets(&self, owner: &str) -> Result<Vec<Budget>>;
    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<Budget>;
    async fn create_budget(&self, owner: &str, new_budget: NewBudget) -> Result<Budget>;
    /// Writes the full merged row; the service resolves partial updates
    /// against the existing record before calling this.
    async fn update_budget(&self, owner: &str, updated: Budget) -> Result<Budget>;
    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<usize>;
    /// Overwrites the stored spend counter; returns affected row count so a
    /// dangling reference can be skipped rather than raised.
    async fn set_expense_spent(&self, owner: &str, budget_id: &str, spent: Decimal)
        -> Result<usize>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_budgets(&self, ctx: &SessionContext) -> Result<Vec<Budget>>;
    fn get_budget(&self, ctx: &SessionContext, budget_id: &str) -> Result<Budget>;
    fn get_budgets_with_goals(&self, ctx: &SessionContext) -> Result<Vec<BudgetWithGoal>>;
    fn get_totals(&self, ctx: &SessionContext) -> Result<BudgetTotals>;
    /// Read-only pre-check exposed to the UI; the same check gates every
    /// create/update write.
    fn check_allocation(
        &self,
        ctx: &SessionContext,
        expense: Decimal,
        savings: Decimal,
        exclude_budget_id: Option<&str>,
    ) -> Result<AllocationCheck>;
    async fn create_budget(&self, ctx: &SessionContext, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(
        &self,
        ctx: &SessionContext,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn delete_budget(&self, ctx: &SessionContext, budget_id: &str) -> Result<()>;
}

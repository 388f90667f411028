use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::budgets::allocation::{totals, validate_allocation, AllocationCheck, BudgetTotals};
use crate::budgets::budgets_model::{Budget, BudgetUpdate, BudgetWithGoal, NewBudget};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::{Error, Result};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::ledger::ledger_traits::LedgerServiceTrait;
use crate::session::SessionContext;

/// Service for managing budgets. Every allocation-touching write is gated by
/// the income check; every mutation is followed by a re-read of the stored
/// row rather than an optimistic in-memory patch.
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    ledger: Arc<dyn LedgerServiceTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        ledger: Arc<dyn LedgerServiceTrait>,
    ) -> Self {
        BudgetService {
            repository,
            goal_repository,
            ledger,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_budgets(&self, ctx: &SessionContext) -> Result<Vec<Budget>> {
        self.repository.get_budgets(&ctx.user_id)
    }

    fn get_budget(&self, ctx: &SessionContext, budget_id: &str) -> Result<Budget> {
        self.repository.get_budget(&ctx.user_id, budget_id)
    }

    fn get_budgets_with_goals(&self, ctx: &SessionContext) -> Result<Vec<BudgetWithGoal>> {
        let budget_list = self.repository.get_budgets(&ctx.user_id)?;
        let goal_names: HashMap<String, String> = self
            .goal_repository
            .get_goals(&ctx.user_id)?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        Ok(budget_list
            .into_iter()
            .map(|budget| {
                let linked_goal_name = budget
                    .linked_savings_goal_id
                    .as_ref()
                    .and_then(|goal_ref| goal_names.get(goal_ref).cloned());
                BudgetWithGoal {
                    budget,
                    linked_goal_name,
                }
            })
            .collect())
    }

    fn get_totals(&self, ctx: &SessionContext) -> Result<BudgetTotals> {
        let budget_list = self.repository.get_budgets(&ctx.user_id)?;
        let income = self.ledger.monthly_income_for(ctx)?;
        Ok(totals(&budget_list, income))
    }

    fn check_allocation(
        &self,
        ctx: &SessionContext,
        expense: Decimal,
        savings: Decimal,
        exclude_budget_id: Option<&str>,
    ) -> Result<AllocationCheck> {
        let budget_list = self.repository.get_budgets(&ctx.user_id)?;
        let income = self.ledger.monthly_income_for(ctx)?;
        Ok(validate_allocation(
            &budget_list,
            income,
            expense,
            savings,
            exclude_budget_id,
        ))
    }

    async fn create_budget(&self, ctx: &SessionContext, new_budget: NewBudget) -> Result<Budget> {
        new_budget.validate()?;

        let check = self.check_allocation(
            ctx,
            new_budget.expense_allocation,
            new_budget.savings_allocation,
            None,
        )?;
        if !check.is_valid {
            debug!(
                "rejecting budget '{}': allocations exceed income by {}",
                new_budget.name, check.exceeded_by
            );
            return Err(Error::over_allocated(check.exceeded_by));
        }

        self.repository.create_budget(&ctx.user_id, new_budget).await
    }

    async fn update_budget(
        &self,
        ctx: &SessionContext,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        update.validate()?;

        let existing = self.repository.get_budget(&ctx.user_id, budget_id)?;

        // Unspecified allocation fields default to the current values so the
        // check always sees the full resulting pair.
        let resulting_expense = update
            .expense_allocation
            .unwrap_or(existing.expense_allocation);
        let resulting_savings = update
            .savings_allocation
            .unwrap_or(existing.savings_allocation);

        if update.touches_allocation() {
            let check =
                self.check_allocation(ctx, resulting_expense, resulting_savings, Some(budget_id))?;
            if !check.is_valid {
                return Err(Error::over_allocated(check.exceeded_by));
            }
        }

        let mut merged = existing;
        if let Some(new_name) = update.name {
            merged.name = new_name;
        }
        if let Some(new_description) = update.description {
            merged.description = new_description;
        }
        if let Some(new_link) = update.linked_savings_goal_id {
            merged.linked_savings_goal_id = new_link;
        }
        merged.expense_allocation = resulting_expense;
        merged.savings_allocation = resulting_savings;

        self.repository.update_budget(&ctx.user_id, merged).await
    }

    async fn delete_budget(&self, ctx: &SessionContext, budget_id: &str) -> Result<()> {
        // Transactions referencing this budget keep their now-dangling
        // budget_id; reads resolve it to no associated name.
        self.repository.delete_budget(&ctx.user_id, budget_id).await?;
        Ok(())
    }
}

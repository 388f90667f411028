use log::debug;
use std::sync::Arc;

use crate::advisor::advisor_model::{AdvisorAction, AdvisorOutcome, FinancialContext};
use crate::budgets::budgets_model::{BudgetUpdate, NewBudget};
use crate::budgets::budgets_traits::BudgetServiceTrait;
use crate::errors::{Error, Result};
use crate::goals::goals_model::ContributionSource;
use crate::goals::goals_traits::GoalServiceTrait;
use crate::ledger::ledger_traits::LedgerServiceTrait;
use crate::session::SessionContext;

/// Routes advisor commands through the budget and goal services. Budget and
/// goal names are resolved to ids here; a name that resolves to nothing is a
/// NotFound error surfaced to the caller.
pub struct AdvisorDispatcher {
    budget_service: Arc<dyn BudgetServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
    ledger_service: Arc<dyn LedgerServiceTrait>,
}

impl AdvisorDispatcher {
    pub fn new(
        budget_service: Arc<dyn BudgetServiceTrait>,
        goal_service: Arc<dyn GoalServiceTrait>,
        ledger_service: Arc<dyn LedgerServiceTrait>,
    ) -> Self {
        AdvisorDispatcher {
            budget_service,
            goal_service,
            ledger_service,
        }
    }

    /// Snapshot of the user's budgets, goals, and transactions for the
    /// advisor endpoints.
    pub fn assemble_context(&self, ctx: &SessionContext) -> Result<FinancialContext> {
        Ok(FinancialContext {
            budgets: self.budget_service.get_budgets_with_goals(ctx)?,
            goals: self.goal_service.get_goals(ctx)?,
            transactions: self.ledger_service.get_transactions_with_budgets(ctx)?,
            totals: self.budget_service.get_totals(ctx)?,
        })
    }

    /// Case-insensitive name match; duplicate names resolve to the most
    /// recently created entry (service lists are newest-first).
    fn resolve_goal_id(&self, ctx: &SessionContext, goal_name: &str) -> Result<String> {
        self.goal_service
            .get_goals(ctx)?
            .into_iter()
            .find(|g| g.name.trim().eq_ignore_ascii_case(goal_name.trim()))
            .map(|g| g.id)
            .ok_or_else(|| Error::NotFound(format!("Goal named '{}' not found", goal_name)))
    }

    fn resolve_budget_id(&self, ctx: &SessionContext, budget_name: &str) -> Result<String> {
        self.budget_service
            .get_budgets(ctx)?
            .into_iter()
            .find(|b| b.name.trim().eq_ignore_ascii_case(budget_name.trim()))
            .map(|b| b.id)
            .ok_or_else(|| Error::NotFound(format!("Budget named '{}' not found", budget_name)))
    }

    pub async fn dispatch(
        &self,
        ctx: &SessionContext,
        action: AdvisorAction,
    ) -> Result<AdvisorOutcome> {
        debug!("dispatching advisor action for user {}", ctx.user_id);
        match action {
            AdvisorAction::CreateBudget {
                name,
                expense_allocation,
                savings_allocation,
                linked_goal_name,
                description,
            } => {
                let linked_savings_goal_id = match linked_goal_name {
                    Some(goal_name) => Some(self.resolve_goal_id(ctx, &goal_name)?),
                    None => None,
                };
                let budget = self
                    .budget_service
                    .create_budget(
                        ctx,
                        NewBudget {
                            name,
                            description,
                            expense_allocation,
                            savings_allocation,
                            linked_savings_goal_id,
                        },
                    )
                    .await?;
                Ok(AdvisorOutcome::BudgetCreated { budget })
            }
            AdvisorAction::EditBudget { budget_id, update } => {
                let budget = self
                    .budget_service
                    .update_budget(ctx, &budget_id, update)
                    .await?;
                Ok(AdvisorOutcome::BudgetUpdated { budget })
            }
            AdvisorAction::DeleteBudget { budget_id } => {
                self.budget_service.delete_budget(ctx, &budget_id).await?;
                Ok(AdvisorOutcome::BudgetDeleted { budget_id })
            }
            AdvisorAction::LinkGoalToBudget {
                budget_name,
                goal_name,
            } => {
                let budget_id = self.resolve_budget_id(ctx, &budget_name)?;
                let goal_id = self.resolve_goal_id(ctx, &goal_name)?;
                let budget = self
                    .budget_service
                    .update_budget(
                        ctx,
                        &budget_id,
                        BudgetUpdate {
                            linked_savings_goal_id: Some(Some(goal_id)),
                            ..Default::default()
                        },
                    )
                    .await?;
                Ok(AdvisorOutcome::GoalLinked { budget })
            }
            AdvisorAction::AddFundsToGoal { goal_name, amount } => {
                let goal_id = self.resolve_goal_id(ctx, &goal_name)?;
                let goal = self
                    .goal_service
                    .add_funds(ctx, &goal_id, amount, ContributionSource::Advisor)
                    .await?;
                Ok(AdvisorOutcome::FundsAdded { goal })
            }
        }
    }
}

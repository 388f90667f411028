use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::{
    ContributionSource, GoalProgressEntry, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate,
};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::session::SessionContext;

pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { repository }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, ctx: &SessionContext) -> Result<Vec<SavingsGoal>> {
        self.repository.get_goals(&ctx.user_id)
    }

    fn get_goal(&self, ctx: &SessionContext, goal_id: &str) -> Result<SavingsGoal> {
        self.repository.get_goal(&ctx.user_id, goal_id)
    }

    async fn create_goal(
        &self,
        ctx: &SessionContext,
        new_goal: NewSavingsGoal,
    ) -> Result<SavingsGoal> {
        new_goal.validate()?;
        self.repository.create_goal(&ctx.user_id, new_goal).await
    }

    async fn update_goal(
        &self,
        ctx: &SessionContext,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal> {
        if let Some(target) = update.target_amount {
            if target < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Goal target cannot be negative".to_string(),
                )));
            }
        }
        self.repository.update_goal(&ctx.user_id, goal_id, update).await
    }

    async fn delete_goal(&self, ctx: &SessionContext, goal_id: &str) -> Result<()> {
        self.repository.delete_goal(&ctx.user_id, goal_id).await?;
        debug!("deleted goal {}; linked budgets keep the dangling id", goal_id);
        Ok(())
    }

    async fn add_funds(
        &self,
        ctx: &SessionContext,
        goal_id: &str,
        amount: Decimal,
        source: ContributionSource,
    ) -> Result<SavingsGoal> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Contribution amount must be positive".to_string(),
            )));
        }
        self.repository
            .add_funds(&ctx.user_id, goal_id, amount, source)
            .await
    }

    fn get_progress(&self, ctx: &SessionContext, goal_id: &str) -> Result<Vec<GoalProgressEntry>> {
        self.repository.get_progress(&ctx.user_id, goal_id)
    }
}

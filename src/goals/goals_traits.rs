use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::goals::goals_model::{
    ContributionSource, GoalProgressEntry, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate,
};
use crate::session::SessionContext;

/// Trait for savings goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goals(&self, owner: &str) -> Result<Vec<SavingsGoal>>;
    fn get_goal(&self, owner: &str, goal_id: &str) -> Result<SavingsGoal>;
    async fn create_goal(&self, owner: &str, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_goal(
        &self,
        owner: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal>;
    async fn delete_goal(&self, owner: &str, goal_id: &str) -> Result<usize>;
    /// Adds to the goal's balance and appends a history row in one
    /// transaction; flips the status to achieved when the target is reached.
    async fn add_funds(
        &self,
        owner: &str,
        goal_id: &str,
        amount: Decimal,
        source: ContributionSource,
    ) -> Result<SavingsGoal>;
    fn get_progress(&self, owner: &str, goal_id: &str) -> Result<Vec<GoalProgressEntry>>;
}

/// Trait for savings goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, ctx: &SessionContext) -> Result<Vec<SavingsGoal>>;
    fn get_goal(&self, ctx: &SessionContext, goal_id: &str) -> Result<SavingsGoal>;
    async fn create_goal(&self, ctx: &SessionContext, new_goal: NewSavingsGoal)
        -> Result<SavingsGoal>;
    async fn update_goal(
        &self,
        ctx: &SessionContext,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal>;
    /// Deleting a goal never cascades; budgets that link to it keep a
    /// dangling reference resolved to nothing at read time.
    async fn delete_goal(&self, ctx: &SessionContext, goal_id: &str) -> Result<()>;
    async fn add_funds(
        &self,
        ctx: &SessionContext,
        goal_id: &str,
        amount: Decimal,
        source: ContributionSource,
    ) -> Result<SavingsGoal>;
    fn get_progress(&self, ctx: &SessionContext, goal_id: &str) -> Result<Vec<GoalProgressEntry>>;
}

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result};
use crate::goals::goals_model::{
    ContributionSource, GoalProgressEntry, GoalProgressEntryDB, GoalStatus, NewSavingsGoal,
    SavingsGoal, SavingsGoalDB, SavingsGoalUpdate,
};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::schema::{goal_progress_history, savings_goals};

pub struct GoalRepository {
    pool: Arc<DbPool>,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        GoalRepository { pool }
    }

    fn load(&self, owner: &str, goal_id: &str) -> Result<SavingsGoalDB> {
        let mut conn = get_connection(&self.pool)?;
        savings_goals::table
            .filter(savings_goals::user_id.eq(owner))
            .filter(savings_goals::id.eq(goal_id))
            .first::<SavingsGoalDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Goal with id {} not found", goal_id)))
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_goals(&self, owner: &str) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = savings_goals::table
            .filter(savings_goals::user_id.eq(owner))
            .order(savings_goals::created_at.desc())
            .load::<SavingsGoalDB>(&mut conn)?;
        Ok(rows.into_iter().map(SavingsGoal::from).collect())
    }

    fn get_goal(&self, owner: &str, goal_id: &str) -> Result<SavingsGoal> {
        Ok(self.load(owner, goal_id)?.into())
    }

    async fn create_goal(&self, owner: &str, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let now = Utc::now().naive_utc();
        let row = SavingsGoalDB {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            name: new_goal.name,
            current_amount: new_goal.current_amount.to_string(),
            target_amount: new_goal.target_amount.to_string(),
            status: GoalStatus::Active.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(savings_goals::table)
            .values(&row)
            .execute(&mut conn)?;

        self.get_goal(owner, &row.id)
    }

    async fn update_goal(
        &self,
        owner: &str,
        goal_id: &str,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal> {
        let existing = self.load(owner, goal_id)?;

        let merged_name = update.name.unwrap_or(existing.name);
        let merged_target = update
            .target_amount
            .map(|t| t.to_string())
            .unwrap_or(existing.target_amount);
        let merged_status = update
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);

        let mut conn = get_connection(&self.pool)?;
        diesel::update(
            savings_goals::table
                .filter(savings_goals::user_id.eq(owner))
                .filter(savings_goals::id.eq(goal_id)),
        )
        .set((
            savings_goals::name.eq(merged_name),
            savings_goals::target_amount.eq(merged_target),
            savings_goals::status.eq(merged_status),
            savings_goals::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        self.get_goal(owner, goal_id)
    }

    async fn delete_goal(&self, owner: &str, goal_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(
            savings_goals::table
                .filter(savings_goals::user_id.eq(owner))
                .filter(savings_goals::id.eq(goal_id)),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Goal with id {} not found",
                goal_id
            )));
        }

        Ok(affected)
    }

    async fn add_funds(
        &self,
        owner: &str,
        goal_id: &str,
        amount: Decimal,
        source: ContributionSource,
    ) -> Result<SavingsGoal> {
        let updated = self.pool.execute(|conn| {
            let goal_row: SavingsGoalDB = savings_goals::table
                .filter(savings_goals::user_id.eq(owner))
                .filter(savings_goals::id.eq(goal_id))
                .first::<SavingsGoalDB>(conn)
                .optional()?
                .ok_or_else(|| Error::NotFound(format!("Goal with id {} not found", goal_id)))?;

            let now = Utc::now().naive_utc();
            let new_amount = goal_row.current_amount_decimal() + amount;
            let target = goal_row.target_amount_decimal();
            let new_status = if target > Decimal::ZERO && new_amount >= target {
                GoalStatus::Achieved
            } else {
                goal_row.status.parse().unwrap_or(GoalStatus::Active)
            };

            diesel::update(
                savings_goals::table
                    .filter(savings_goals::user_id.eq(owner))
                    .filter(savings_goals::id.eq(goal_id)),
            )
            .set((
                savings_goals::current_amount.eq(new_amount.to_string()),
                savings_goals::status.eq(new_status.as_str().to_string()),
                savings_goals::updated_at.eq(now),
            ))
            .execute(conn)?;

            let history_row = GoalProgressEntryDB {
                id: Uuid::new_v4().to_string(),
                user_id: owner.to_string(),
                goal_id: goal_id.to_string(),
                amount: amount.to_string(),
                source: source.as_str().to_string(),
                recorded_at: now,
            };
            diesel::insert_into(goal_progress_history::table)
                .values(&history_row)
                .execute(conn)?;

            savings_goals::table
                .filter(savings_goals::user_id.eq(owner))
                .filter(savings_goals::id.eq(goal_id))
                .first::<SavingsGoalDB>(conn)
                .map_err(Error::from)
        })?;

        Ok(updated.into())
    }

    fn get_progress(&self, owner: &str, goal_id: &str) -> Result<Vec<GoalProgressEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goal_progress_history::table
            .filter(goal_progress_history::user_id.eq(owner))
            .filter(goal_progress_history::goal_id.eq(goal_id))
            .order(goal_progress_history::recorded_at.desc())
            .load::<GoalProgressEntryDB>(&mut conn)?;
        Ok(rows.into_iter().map(GoalProgressEntry::from).collect())
    }
}

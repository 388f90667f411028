use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::budgets::budgets_model::{Budget, BudgetDB, NewBudget};
use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        BudgetRepository { pool }
    }

    fn load(&self, owner: &str, budget_id: &str) -> Result<BudgetDB> {
        let mut conn = get_connection(&self.pool)?;
        budgets::table
            .filter(budgets::user_id.eq(owner))
            .filter(budgets::id.eq(budget_id))
            .first::<BudgetDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Budget with id {} not found", budget_id)))
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn get_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::user_id.eq(owner))
            .order(budgets::created_at.desc())
            .load::<BudgetDB>(&mut conn)?;
        Ok(rows.into_iter().map(Budget::from).collect())
    }

    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<Budget> {
        Ok(self.load(owner, budget_id)?.into())
    }

    async fn create_budget(&self, owner: &str, new_budget: NewBudget) -> Result<Budget> {
        let now = Utc::now().naive_utc();
        let row = BudgetDB {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            name: new_budget.name,
            description: new_budget.description,
            expense_allocation: new_budget.expense_allocation.to_string(),
            savings_allocation: new_budget.savings_allocation.to_string(),
            expense_spent: Decimal::ZERO.to_string(),
            linked_savings_goal_id: new_budget.linked_savings_goal_id,
            last_reset: None,
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(budgets::table)
            .values(&row)
            .execute(&mut conn)?;

        self.get_budget(owner, &row.id)
    }

    async fn update_budget(&self, owner: &str, updated: Budget) -> Result<Budget> {
        let budget_id = updated.id.clone();

        let mut conn = get_connection(&self.pool)?;
        diesel::update(
            budgets::table
                .filter(budgets::user_id.eq(owner))
                .filter(budgets::id.eq(&budget_id)),
        )
        .set((
            budgets::name.eq(updated.name),
            budgets::description.eq(updated.description),
            budgets::expense_allocation.eq(updated.expense_allocation.to_string()),
            budgets::savings_allocation.eq(updated.savings_allocation.to_string()),
            budgets::linked_savings_goal_id.eq(updated.linked_savings_goal_id),
            budgets::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        self.get_budget(owner, &budget_id)
    }

    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(
            budgets::table
                .filter(budgets::user_id.eq(owner))
                .filter(budgets::id.eq(budget_id)),
        )
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Budget with id {} not found",
                budget_id
            )));
        }

        Ok(affected)
    }

    async fn set_expense_spent(
        &self,
        owner: &str,
        budget_id: &str,
        spent: Decimal,
    ) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::update(
            budgets::table
                .filter(budgets::user_id.eq(owner))
                .filter(budgets::id.eq(budget_id)),
        )
        .set((
            budgets::expense_spent.eq(spent.to_string()),
            budgets::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?)
    }
}

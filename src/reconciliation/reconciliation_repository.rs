use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::budgets::budgets_model::BudgetDB;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result};
use crate::goals::goals_model::{ContributionSource, GoalProgressEntryDB, GoalStatus, SavingsGoalDB};
use crate::ledger::ledger_model::Period;
use crate::reconciliation::reconciliation_model::TransferReport;
use crate::reconciliation::reconciliation_traits::MonthlyResetRepositoryTrait;
use crate::schema::{budgets, goal_progress_history, savings_goals};

pub struct MonthlyResetRepository {
    pool: Arc<DbPool>,
}

impl MonthlyResetRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        MonthlyResetRepository { pool }
    }
}

#[async_trait]
impl MonthlyResetRepositoryTrait for MonthlyResetRepository {
    async fn process_monthly_transfers(
        &self,
        owner: &str,
        today: NaiveDate,
    ) -> Result<TransferReport> {
        let period_start = Period::containing(today).start;

        self.pool.execute(|conn| {
            let due_budgets: Vec<BudgetDB> = budgets::table
                .filter(budgets::user_id.eq(owner))
                .filter(
                    budgets::last_reset
                        .is_null()
                        .or(budgets::last_reset.lt(period_start)),
                )
                .load::<BudgetDB>(conn)?;

            let now = Utc::now().naive_utc();
            let mut transfers_count = 0u32;
            let mut total_transferred = Decimal::ZERO;

            for budget_row in &due_budgets {
                let savings = budget_row.savings_allocation_decimal();
                if savings > Decimal::ZERO {
                    if let Some(goal_ref) = &budget_row.linked_savings_goal_id {
                        // A dangling reference is treated as unlinked: the
                        // budget still resets but contributes no transfer.
                        let goal_row: Option<SavingsGoalDB> = savings_goals::table
                            .filter(savings_goals::user_id.eq(owner))
                            .filter(savings_goals::id.eq(goal_ref))
                            .first::<SavingsGoalDB>(conn)
                            .optional()?;

                        if let Some(goal_row) = goal_row {
                            let new_amount = goal_row.current_amount_decimal() + savings;
                            let target = goal_row.target_amount_decimal();
                            let new_status = if target > Decimal::ZERO && new_amount >= target {
                                GoalStatus::Achieved
                            } else {
                                goal_row.status.parse().unwrap_or(GoalStatus::Active)
                            };

                            diesel::update(
                                savings_goals::table.filter(savings_goals::id.eq(&goal_row.id)),
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
                                goal_id: goal_row.id.clone(),
                                amount: savings.to_string(),
                                source: ContributionSource::MonthlyReset.as_str().to_string(),
                                recorded_at: now,
                            };
                            diesel::insert_into(goal_progress_history::table)
                                .values(&history_row)
                                .execute(conn)?;

                            transfers_count += 1;
                            total_transferred += savings;
                        }
                    }
                }

                diesel::update(budgets::table.filter(budgets::id.eq(&budget_row.id)))
                    .set((
                        budgets::expense_spent.eq(Decimal::ZERO.to_string()),
                        budgets::last_reset.eq(today),
                        budgets::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }

            Ok::<TransferReport, Error>(TransferReport {
                transfers_count,
                total_transferred,
            })
        })
    }
}

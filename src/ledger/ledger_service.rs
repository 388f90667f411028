use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::errors::Result;
use crate::ledger::ledger_model::{
    NewTransaction, Period, Transaction, TransactionType, TransactionUpdate,
    TransactionWithBudget,
};
use crate::ledger::ledger_traits::{LedgerServiceTrait, TransactionRepositoryTrait};
use crate::session::SessionContext;

/// Sums income transactions whose date falls inside the period.
/// Empty input yields zero.
pub fn monthly_income(transactions: &[Transaction], period: &Period) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            t.transaction_type == TransactionType::Income && period.contains(t.transaction_date)
        })
        .map(|t| t.amount)
        .sum()
}

/// Expense totals inside the period, grouped by the budget they are logged
/// against. Transactions without a budget are not represented.
pub fn spent_by_budget(
    transactions: &[Transaction],
    period: &Period,
) -> HashMap<String, Decimal> {
    let mut by_budget: HashMap<String, Decimal> = HashMap::new();
    for txn in transactions.iter().filter(|t| {
        t.transaction_type == TransactionType::Expense && period.contains(t.transaction_date)
    }) {
        if let Some(budget_ref) = &txn.budget_id {
            *by_budget.entry(budget_ref.clone()).or_insert(Decimal::ZERO) += txn.amount;
        }
    }
    by_budget
}

pub struct LedgerService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
}

impl LedgerService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
    ) -> Self {
        LedgerService {
            transaction_repository,
            budget_repository,
        }
    }

    /// Re-derives a budget's stored expense counter from the current period's
    /// transactions. A vanished budget (dangling reference) is skipped.
    async fn refresh_expense_spent(&self, ctx: &SessionContext, budget_ref: &str) -> Result<()> {
        let period = Period::current(ctx.timezone);
        let rows = self
            .transaction_repository
            .get_transactions_in_period(&ctx.user_id, &period)?;
        let spent = spent_by_budget(&rows, &period)
            .remove(budget_ref)
            .unwrap_or(Decimal::ZERO);

        let affected = self
            .budget_repository
            .set_expense_spent(&ctx.user_id, budget_ref, spent)
            .await?;
        if affected == 0 {
            debug!(
                "budget {} no longer exists, skipping spent refresh",
                budget_ref
            );
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn monthly_income_for(&self, ctx: &SessionContext) -> Result<Decimal> {
        let period = Period::current(ctx.timezone);
        let rows = self
            .transaction_repository
            .get_transactions_in_period(&ctx.user_id, &period)?;
        Ok(monthly_income(&rows, &period))
    }

    fn get_transactions(&self, ctx: &SessionContext) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_transactions(&ctx.user_id)
    }

    fn get_transactions_with_budgets(
        &self,
        ctx: &SessionContext,
    ) -> Result<Vec<TransactionWithBudget>> {
        let rows = self.transaction_repository.get_transactions(&ctx.user_id)?;
        let budget_names: HashMap<String, String> = self
            .budget_repository
            .get_budgets(&ctx.user_id)?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|txn| {
                let budget_name = txn
                    .budget_id
                    .as_ref()
                    .and_then(|budget_ref| budget_names.get(budget_ref).cloned());
                TransactionWithBudget {
                    transaction: txn,
                    budget_name,
                }
            })
            .collect())
    }

    async fn create_transaction(
        &self,
        ctx: &SessionContext,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;
        let created = self
            .transaction_repository
            .create_transaction(&ctx.user_id, new_transaction)
            .await?;

        if let Some(budget_ref) = created.budget_id.clone() {
            self.refresh_expense_spent(ctx, &budget_ref).await?;
        }
        Ok(created)
    }

    async fn update_transaction(
        &self,
        ctx: &SessionContext,
        txn_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        if let Some(amount) = update.amount {
            if amount <= Decimal::ZERO {
                return Err(crate::errors::Error::Validation(
                    crate::errors::ValidationError::InvalidInput(
                        "Transaction amount must be positive".to_string(),
                    ),
                ));
            }
        }

        let before = self.transaction_repository.get_transaction(&ctx.user_id, txn_id)?;
        let after = self
            .transaction_repository
            .update_transaction(&ctx.user_id, txn_id, update)
            .await?;

        let mut touched: Vec<String> = Vec::new();
        if let Some(budget_ref) = before.budget_id {
            touched.push(budget_ref);
        }
        if let Some(budget_ref) = after.budget_id.clone() {
            if !touched.contains(&budget_ref) {
                touched.push(budget_ref);
            }
        }
        for budget_ref in touched {
            self.refresh_expense_spent(ctx, &budget_ref).await?;
        }
        Ok(after)
    }

    async fn delete_transaction(&self, ctx: &SessionContext, txn_id: &str) -> Result<Transaction> {
        let deleted = self
            .transaction_repository
            .delete_transaction(&ctx.user_id, txn_id)
            .await?;
        if let Some(budget_ref) = deleted.budget_id.clone() {
            self.refresh_expense_spent(ctx, &budget_ref).await?;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn txn(
        txn_type: TransactionType,
        amount: Decimal,
        date: NaiveDate,
        budget_id: Option<&str>,
    ) -> Transaction {
        let now = chrono::Utc::now().naive_utc();
        Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "user-1".to_string(),
            transaction_type: txn_type,
            amount,
            category: "General".to_string(),
            transaction_date: date,
            budget_id: budget_id.map(|s| s.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn june() -> Period {
        Period::containing(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    #[test]
    fn test_monthly_income_empty_is_zero() {
        assert_eq!(monthly_income(&[], &june()), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_income_sums_income_in_period_only() {
        let in_period = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let out_of_period = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let rows = vec![
            txn(TransactionType::Income, dec!(1500), in_period, None),
            txn(TransactionType::Income, dec!(500), in_period, None),
            txn(TransactionType::Income, dec!(9999), out_of_period, None),
            txn(TransactionType::Expense, dec!(300), in_period, None),
        ];
        assert_eq!(monthly_income(&rows, &june()), dec!(2000));
    }

    #[test]
    fn test_spent_by_budget_groups_expenses() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let rows = vec![
            txn(TransactionType::Expense, dec!(40), date, Some("groceries")),
            txn(TransactionType::Expense, dec!(60), date, Some("groceries")),
            txn(TransactionType::Expense, dec!(25), date, Some("fun")),
            txn(TransactionType::Expense, dec!(10), date, None),
            txn(TransactionType::Income, dec!(1000), date, Some("groceries")),
        ];
        let spent = spent_by_budget(&rows, &june());
        assert_eq!(spent.get("groceries"), Some(&dec!(100)));
        assert_eq!(spent.get("fun"), Some(&dec!(25)));
        assert_eq!(spent.len(), 2);
    }
}

use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::errors::Result;
use crate::ledger::ledger_model::Period;
use crate::reconciliation::reconciliation_model::{is_reset_due, TransferReport};
use crate::reconciliation::reconciliation_traits::{
    MonthlyResetRepositoryTrait, MonthlyResetServiceTrait,
};
use crate::session::SessionContext;

/// Month-boundary job transferring accumulated savings allocations into
/// linked goals and zeroing spend counters, once per calendar month in the
/// user's local timezone.
pub struct MonthlyResetService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    reset_repository: Arc<dyn MonthlyResetRepositoryTrait>,
}

impl MonthlyResetService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        reset_repository: Arc<dyn MonthlyResetRepositoryTrait>,
    ) -> Self {
        MonthlyResetService {
            budget_repository,
            reset_repository,
        }
    }
}

#[async_trait]
impl MonthlyResetServiceTrait for MonthlyResetService {
    fn is_reset_due(&self, ctx: &SessionContext) -> Result<bool> {
        let period = Period::current(ctx.timezone);
        let budget_list = self.budget_repository.get_budgets(&ctx.user_id)?;
        Ok(budget_list
            .iter()
            .any(|budget| is_reset_due(budget, period.start)))
    }

    async fn run_monthly_reset(&self, ctx: &SessionContext) -> Result<TransferReport> {
        if !self.is_reset_due(ctx)? {
            debug!(
                "monthly reset already applied for user {} this period",
                ctx.user_id
            );
            return Ok(TransferReport::none());
        }

        let today = ctx.today();
        let report = self
            .reset_repository
            .process_monthly_transfers(&ctx.user_id, today)
            .await?;

        info!(
            "monthly reset for user {}: {} transfers totalling {}",
            ctx.user_id, report.transfers_count, report.total_transferred
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budgets::budgets_model::{Budget, NewBudget};
    use crate::errors::{DatabaseError, Error};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::RwLock;

    // ============== Mocks ==============

    struct MockBudgetRepository {
        budgets: RwLock<Vec<Budget>>,
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn get_budgets(&self, _owner: &str) -> Result<Vec<Budget>> {
            Ok(self.budgets.read().unwrap().clone())
        }
        fn get_budget(&self, _owner: &str, _budget_id: &str) -> Result<Budget> {
            unimplemented!()
        }
        async fn create_budget(&self, _owner: &str, _new_budget: NewBudget) -> Result<Budget> {
            unimplemented!()
        }
        async fn update_budget(&self, _owner: &str, _updated: Budget) -> Result<Budget> {
            unimplemented!()
        }
        async fn delete_budget(&self, _owner: &str, _budget_id: &str) -> Result<usize> {
            unimplemented!()
        }
        async fn set_expense_spent(
            &self,
            _owner: &str,
            _budget_id: &str,
            _spent: Decimal,
        ) -> Result<usize> {
            unimplemented!()
        }
    }

    struct MockResetRepository {
        report: TransferReport,
        fail_on_purpose: bool,
        calls: AtomicU32,
    }

    impl MockResetRepository {
        fn returning(report: TransferReport) -> Self {
            Self {
                report,
                fail_on_purpose: false,
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                report: TransferReport::none(),
                fail_on_purpose: true,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MonthlyResetRepositoryTrait for MockResetRepository {
        async fn process_monthly_transfers(
            &self,
            _owner: &str,
            _today: NaiveDate,
        ) -> Result<TransferReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_purpose {
                return Err(Error::Database(DatabaseError::MigrationFailed(
                    "intentional failure".to_string(),
                )));
            }
            Ok(self.report.clone())
        }
    }

    // ============== Helpers ==============

    fn ctx() -> SessionContext {
        SessionContext::with_default_timezone("user-1")
    }

    fn budget_reset_on(last_reset: Option<NaiveDate>) -> Budget {
        let now = chrono::Utc::now().naive_utc();
        Budget {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "user-1".to_string(),
            name: "Savings Plan".to_string(),
            description: None,
            expense_allocation: Decimal::ZERO,
            savings_allocation: dec!(150),
            expense_spent: dec!(40),
            linked_savings_goal_id: Some("goal-1".to_string()),
            last_reset,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_service(
        budgets: Vec<Budget>,
        reset_repo: MockResetRepository,
    ) -> (MonthlyResetService, Arc<MockResetRepository>) {
        let reset_repo = Arc::new(reset_repo);
        let service = MonthlyResetService::new(
            Arc::new(MockBudgetRepository {
                budgets: RwLock::new(budgets),
            }),
            reset_repo.clone(),
        );
        (service, reset_repo)
    }

    // ============== Tests ==============

    #[tokio::test]
    async fn test_due_budget_triggers_batch() {
        let expected = TransferReport {
            transfers_count: 1,
            total_transferred: dec!(150),
        };
        let (service, repo) = make_service(
            vec![budget_reset_on(None)],
            MockResetRepository::returning(expected.clone()),
        );

        assert!(service.is_reset_due(&ctx()).unwrap());
        let report = service.run_monthly_reset(&ctx()).await.unwrap();
        assert_eq!(report, expected);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_already_reconciled_period_short_circuits() {
        let session = ctx();
        let (service, repo) = make_service(
            vec![budget_reset_on(Some(session.today()))],
            MockResetRepository::returning(TransferReport {
                transfers_count: 9,
                total_transferred: dec!(999),
            }),
        );

        assert!(!service.is_reset_due(&session).unwrap());
        let report = service.run_monthly_reset(&session).await.unwrap();
        assert_eq!(report, TransferReport::none());
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_budgets_means_nothing_due() {
        let (service, repo) = make_service(
            vec![],
            MockResetRepository::returning(TransferReport::none()),
        );

        let report = service.run_monthly_reset(&ctx()).await.unwrap();
        assert_eq!(report, TransferReport::none());
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_failure_surfaces_once() {
        let (service, repo) =
            make_service(vec![budget_reset_on(None)], MockResetRepository::failing());

        let err = service.run_monthly_reset(&ctx()).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        // No retry: one call, one reported failure.
        assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
    }
}

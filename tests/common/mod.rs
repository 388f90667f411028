use std::sync::Arc;

use tempfile::TempDir;

use centsible_core::budgets::{BudgetRepository, BudgetService};
use centsible_core::db::{self, DbPool};
use centsible_core::goals::{GoalRepository, GoalService};
use centsible_core::ledger::{LedgerService, TransactionRepository};
use centsible_core::reconciliation::{MonthlyResetRepository, MonthlyResetService};

pub struct TestApp {
    pub pool: Arc<DbPool>,
    pub budgets: BudgetService,
    pub goals: GoalService,
    pub ledger: Arc<LedgerService>,
    pub reset: MonthlyResetService,
    _dir: TempDir,
}

/// Fresh temp-file SQLite database with migrations applied, wired into the
/// full service stack.
pub fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().expect("temp path is not utf-8"))
        .expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let budget_repo = Arc::new(BudgetRepository::new(pool.clone()));
    let goal_repo = Arc::new(GoalRepository::new(pool.clone()));
    let txn_repo = Arc::new(TransactionRepository::new(pool.clone()));

    let ledger = Arc::new(LedgerService::new(txn_repo, budget_repo.clone()));
    let budgets = BudgetService::new(budget_repo.clone(), goal_repo.clone(), ledger.clone());
    let goals = GoalService::new(goal_repo);
    let reset = MonthlyResetService::new(
        budget_repo,
        Arc::new(MonthlyResetRepository::new(pool.clone())),
    );

    TestApp {
        pool,
        budgets,
        goals,
        ledger,
        reset,
        _dir: dir,
    }
}

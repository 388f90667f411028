mod common;

use centsible_core::budgets::{BudgetServiceTrait, BudgetUpdate, NewBudget};
use centsible_core::errors::{Error, ValidationError};
use centsible_core::ledger::{LedgerServiceTrait, NewTransaction, TransactionType};
use centsible_core::SessionContext;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ctx() -> SessionContext {
    SessionContext::with_default_timezone("user-1")
}

fn new_budget(name: &str, expense: Decimal, savings: Decimal) -> NewBudget {
    NewBudget {
        name: name.to_string(),
        description: None,
        expense_allocation: expense,
        savings_allocation: savings,
        linked_savings_goal_id: None,
    }
}

async fn seed_income(app: &common::TestApp, session: &SessionContext, amount: Decimal) {
    app.ledger
        .create_transaction(
            session,
            NewTransaction {
                transaction_type: TransactionType::Income,
                amount,
                category: "Salary".to_string(),
                transaction_date: session.today(),
                budget_id: None,
            },
        )
        .await
        .expect("Failed to seed income");
}

#[tokio::test]
async fn test_create_then_totals_round_trip() {
    let app = common::setup();
    let session = ctx();
    seed_income(&app, &session, dec!(2000)).await;

    let before = app.budgets.get_totals(&session).unwrap();

    app.budgets
        .create_budget(&session, new_budget("Groceries", dec!(500), dec!(100)))
        .await
        .unwrap();

    let after = app.budgets.get_totals(&session).unwrap();
    assert_eq!(after.total_allocation - before.total_allocation, dec!(600));
    assert_eq!(
        before.remaining_to_allocate - after.remaining_to_allocate,
        dec!(600)
    );
    assert!(!after.is_over_allocated);
}

#[tokio::test]
async fn test_over_allocation_rejected_with_exact_excess() {
    let app = common::setup();
    let session = ctx();
    seed_income(&app, &session, dec!(2000)).await;

    app.budgets
        .create_budget(&session, new_budget("Rent", dec!(1200), Decimal::ZERO))
        .await
        .unwrap();

    // 1200 + 500 + 400 = 2100 > 2000
    let err = app
        .budgets
        .create_budget(&session, new_budget("Fun", dec!(500), dec!(400)))
        .await
        .unwrap_err();

    match err {
        Error::Validation(ValidationError::OverAllocated { exceeded_by }) => {
            assert_eq!(exceeded_by, dec!(100));
        }
        other => panic!("expected OverAllocated, got {:?}", other),
    }

    // The rejected write left nothing behind.
    let budgets = app.budgets.get_budgets(&session).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].name, "Rent");
}

#[tokio::test]
async fn test_update_validates_resulting_pair_excluding_self() {
    let app = common::setup();
    let session = ctx();
    seed_income(&app, &session, dec!(2000)).await;

    let rent = app
        .budgets
        .create_budget(&session, new_budget("Rent", dec!(1200), Decimal::ZERO))
        .await
        .unwrap();

    // 1200 + 900 would exceed income.
    let err = app
        .budgets
        .update_budget(
            &session,
            &rent.id,
            BudgetUpdate {
                savings_allocation: Some(dec!(900)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OverAllocated { .. })
    ));

    // 1200 + 800 fits exactly; the unspecified expense side came from the
    // existing record and the budget's own prior pair was excluded.
    let updated = app
        .budgets
        .update_budget(
            &session,
            &rent.id,
            BudgetUpdate {
                savings_allocation: Some(dec!(800)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.expense_allocation, dec!(1200));
    assert_eq!(updated.savings_allocation, dec!(800));

    let totals = app.budgets.get_totals(&session).unwrap();
    assert_eq!(totals.remaining_to_allocate, Decimal::ZERO);
    assert!(!totals.is_over_allocated);
}

#[tokio::test]
async fn test_expense_transactions_drive_spent_counter() {
    let app = common::setup();
    let session = ctx();
    seed_income(&app, &session, dec!(2000)).await;

    let groceries = app
        .budgets
        .create_budget(&session, new_budget("Groceries", dec!(400), Decimal::ZERO))
        .await
        .unwrap();

    for amount in [dec!(40), dec!(60)] {
        app.ledger
            .create_transaction(
                &session,
                NewTransaction {
                    transaction_type: TransactionType::Expense,
                    amount,
                    category: "Food".to_string(),
                    transaction_date: session.today(),
                    budget_id: Some(groceries.id.clone()),
                },
            )
            .await
            .unwrap();
    }

    let stored = app.budgets.get_budget(&session, &groceries.id).unwrap();
    assert_eq!(stored.expense_spent, dec!(100));
}

#[tokio::test]
async fn test_delete_leaves_transactions_dangling_but_readable() {
    let app = common::setup();
    let session = ctx();
    seed_income(&app, &session, dec!(2000)).await;

    let rent = app
        .budgets
        .create_budget(&session, new_budget("Rent", dec!(1200), Decimal::ZERO))
        .await
        .unwrap();

    for _ in 0..5 {
        app.ledger
            .create_transaction(
                &session,
                NewTransaction {
                    transaction_type: TransactionType::Expense,
                    amount: dec!(240),
                    category: "Housing".to_string(),
                    transaction_date: session.today(),
                    budget_id: Some(rent.id.clone()),
                },
            )
            .await
            .unwrap();
    }

    app.budgets.delete_budget(&session, &rent.id).await.unwrap();

    let views = app.ledger.get_transactions_with_budgets(&session).unwrap();
    let dangling: Vec<_> = views
        .iter()
        .filter(|v| v.transaction.budget_id.as_deref() == Some(rent.id.as_str()))
        .collect();
    assert_eq!(dangling.len(), 5);
    assert!(dangling.iter().all(|v| v.budget_name.is_none()));
}

#[tokio::test]
async fn test_ownership_filter_isolates_users() {
    let app = common::setup();
    let session = ctx();
    let other = SessionContext::with_default_timezone("user-2");

    seed_income(&app, &session, dec!(2000)).await;
    seed_income(&app, &other, dec!(50)).await;

    // user-1's income does not fund user-2's budgets.
    let err = app
        .budgets
        .create_budget(&other, new_budget("Rent", dec!(1200), Decimal::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OverAllocated { .. })
    ));

    app.budgets
        .create_budget(&session, new_budget("Rent", dec!(1200), Decimal::ZERO))
        .await
        .unwrap();
    assert!(app.budgets.get_budgets(&other).unwrap().is_empty());
}

//! Pure allocation arithmetic over a user's budget set.

use num_traits::Zero;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::budgets::budgets_model::Budget;

/// Aggregate view of a budget set against the month's income.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    pub monthly_income: Decimal,
    pub total_expense_allocation: Decimal,
    pub total_savings_allocation: Decimal,
    pub total_allocation: Decimal,
    pub total_expense_spent: Decimal,
    pub remaining_to_allocate: Decimal,
    pub is_over_allocated: bool,
}

/// Pure reduction over the budget set; empty input yields zeros.
pub fn totals(budgets: &[Budget], monthly_income: Decimal) -> BudgetTotals {
    let total_expense_allocation: Decimal =
        budgets.iter().map(|b| b.expense_allocation).sum();
    let total_savings_allocation: Decimal =
        budgets.iter().map(|b| b.savings_allocation).sum();
    let total_expense_spent: Decimal = budgets.iter().map(|b| b.expense_spent).sum();
    let total_allocation = total_expense_allocation + total_savings_allocation;
    let remaining_to_allocate = monthly_income - total_allocation;

    BudgetTotals {
        monthly_income,
        total_expense_allocation,
        total_savings_allocation,
        total_allocation,
        total_expense_spent,
        remaining_to_allocate,
        is_over_allocated: remaining_to_allocate < Decimal::ZERO,
    }
}

/// Result of checking a proposed allocation pair against monthly income.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationCheck {
    pub is_valid: bool,
    pub remaining: Decimal,
    pub exceeded_by: Decimal,
}

/// Checks whether a proposed `(expense, savings)` pair fits within monthly
/// income alongside all competing budgets. `exclude_budget_id` names the
/// budget being edited so its prior allocation does not double-count.
///
/// A zero-zero proposal skips the income check entirely: such a budget is
/// meaningless but not harmful.
pub fn validate_allocation(
    budgets: &[Budget],
    monthly_income: Decimal,
    expense: Decimal,
    savings: Decimal,
    exclude_budget_id: Option<&str>,
) -> AllocationCheck {
    let competing_total: Decimal = budgets
        .iter()
        .filter(|b| exclude_budget_id.map_or(true, |excluded| b.id != excluded))
        .map(Budget::total_allocation)
        .sum();

    if expense.is_zero() && savings.is_zero() {
        return AllocationCheck {
            is_valid: true,
            remaining: monthly_income - competing_total,
            exceeded_by: Decimal::ZERO,
        };
    }

    let new_total = competing_total + expense + savings;
    let remaining = monthly_income - new_total;
    AllocationCheck {
        is_valid: remaining >= Decimal::ZERO,
        remaining,
        exceeded_by: if remaining < Decimal::ZERO {
            -remaining
        } else {
            Decimal::ZERO
        },
    }
}

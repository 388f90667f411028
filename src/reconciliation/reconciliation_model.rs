use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::budgets_model::Budget;

/// Outcome of one monthly reset run, for user-facing confirmation messaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    pub transfers_count: u32,
    pub total_transferred: Decimal,
}

impl TransferReport {
    /// The "no transfers needed" result of an already-reconciled period.
    pub fn none() -> Self {
        TransferReport {
            transfers_count: 0,
            total_transferred: Decimal::ZERO,
        }
    }
}

/// A budget is due for reset when it has never been reset or its last reset
/// predates the current period.
pub fn is_reset_due(budget: &Budget, period_start: NaiveDate) -> bool {
    budget
        .last_reset
        .map_or(true, |reset_date| reset_date < period_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn budget_reset_on(last_reset: Option<NaiveDate>) -> Budget {
        let now = chrono::Utc::now().naive_utc();
        Budget {
            id: "b".to_string(),
            user_id: "user-1".to_string(),
            name: "Groceries".to_string(),
            description: None,
            expense_allocation: dec!(400),
            savings_allocation: dec!(100),
            expense_spent: dec!(250),
            linked_savings_goal_id: None,
            last_reset,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_never_reset_budget_is_due() {
        let period_start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(is_reset_due(&budget_reset_on(None), period_start));
    }

    #[test]
    fn test_prior_month_reset_is_due() {
        let period_start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        assert!(is_reset_due(&budget_reset_on(Some(last)), period_start));
    }

    #[test]
    fn test_current_period_reset_is_not_due() {
        let period_start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        for day in [1, 15, 30] {
            let last = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
            assert!(!is_reset_due(&budget_reset_on(Some(last)), period_start));
        }
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::allocation::BudgetTotals;
use crate::budgets::budgets_model::{Budget, BudgetUpdate, BudgetWithGoal};
use crate::errors::Result;
use crate::goals::goals_model::SavingsGoal;
use crate::ledger::ledger_model::TransactionWithBudget;

/// Advisor-originated commands. The surrounding chat layer parses the
/// model's action tokens into these values; by the time they reach the core
/// they are plain structured data dispatched through the same validated
/// store operations as direct user actions, with no privilege distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdvisorAction {
    CreateBudget {
        name: String,
        expense_allocation: Decimal,
        savings_allocation: Decimal,
        #[serde(default)]
        linked_goal_name: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    EditBudget {
        budget_id: String,
        #[serde(default)]
        update: BudgetUpdate,
    },
    DeleteBudget {
        budget_id: String,
    },
    LinkGoalToBudget {
        budget_name: String,
        goal_name: String,
    },
    AddFundsToGoal {
        goal_name: String,
        amount: Decimal,
    },
}

/// Typed result handed back for confirmation messaging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdvisorOutcome {
    BudgetCreated { budget: Budget },
    BudgetUpdated { budget: Budget },
    BudgetDeleted { budget_id: String },
    GoalLinked { budget: Budget },
    FundsAdded { goal: SavingsGoal },
}

/// The full financial picture shipped to the advisor endpoints. Weak
/// references are already resolved lookup-or-null, so the payload never
/// leaks dangling ids as live entities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialContext {
    pub budgets: Vec<BudgetWithGoal>,
    pub goals: Vec<SavingsGoal>,
    pub transactions: Vec<TransactionWithBudget>,
    pub totals: BudgetTotals,
}

impl FinancialContext {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

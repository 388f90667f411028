use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Domain model for a monthly budget. Each budget claims an expense-spend
/// allocation and a savings-transfer allocation against the user's monthly
/// income; `linked_savings_goal_id` is a weak reference that may dangle after
/// the goal is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub expense_allocation: Decimal,
    pub savings_allocation: Decimal,
    pub expense_spent: Decimal,
    pub linked_savings_goal_id: Option<String>,
    pub last_reset: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    /// Combined monthly claim this budget makes against income.
    pub fn total_allocation(&self) -> Decimal {
        self.expense_allocation + self.savings_allocation
    }
}

/// Database model for budgets
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub expense_allocation: String,
    pub savings_allocation: String,
    pub expense_spent: String,
    pub linked_savings_goal_id: Option<String>,
    pub last_reset: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetDB {
    pub fn expense_allocation_decimal(&self) -> Decimal {
        self.expense_allocation.parse().unwrap_or(Decimal::ZERO)
    }

    pub fn savings_allocation_decimal(&self) -> Decimal {
        self.savings_allocation.parse().unwrap_or(Decimal::ZERO)
    }

    pub fn expense_spent_decimal(&self) -> Decimal {
        self.expense_spent.parse().unwrap_or(Decimal::ZERO)
    }
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        let expense_allocation = db.expense_allocation_decimal();
        let savings_allocation = db.savings_allocation_decimal();
        let expense_spent = db.expense_spent_decimal();
        Budget {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            expense_allocation,
            savings_allocation,
            expense_spent,
            linked_savings_goal_id: db.linked_savings_goal_id,
            last_reset: db.last_reset,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for creating a new budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    pub description: Option<String>,
    pub expense_allocation: Decimal,
    pub savings_allocation: Decimal,
    pub linked_savings_goal_id: Option<String>,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Budget name cannot be empty".to_string(),
            )));
        }
        if self.expense_allocation < Decimal::ZERO || self.savings_allocation < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Budget allocations cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update for an existing budget. Absent fields keep their current
/// values, so validation always operates on the full resulting allocation
/// pair. The double-option fields distinguish `null` (clear) from absent
/// (keep).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    pub expense_allocation: Option<Decimal>,
    pub savings_allocation: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub linked_savings_goal_id: Option<Option<String>>,
}

impl BudgetUpdate {
    pub fn touches_allocation(&self) -> bool {
        self.expense_allocation.is_some() || self.savings_allocation.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(new_name) = &self.name {
            if new_name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Budget name cannot be empty".to_string(),
                )));
            }
        }
        if self.expense_allocation.is_some_and(|a| a < Decimal::ZERO)
            || self.savings_allocation.is_some_and(|a| a < Decimal::ZERO)
        {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Budget allocations cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Read view resolving the weak goal reference lookup-or-null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithGoal {
    #[serde(flatten)]
    pub budget: Budget,
    pub linked_goal_name: Option<String>,
}

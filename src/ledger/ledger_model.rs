use chrono::{Datelike, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const TRANSACTION_TYPE_INCOME: &str = "INCOME";
pub const TRANSACTION_TYPE_EXPENSE: &str = "EXPENSE";

/// Inclusive calendar-month window used for income aggregation and reset
/// checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// The calendar month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or(date);
        let next_month_start = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        };
        let end = next_month_start
            .and_then(|d| d.pred_opt())
            .unwrap_or(date);
        Period { start, end }
    }

    /// The current calendar month in the given timezone.
    pub fn current(timezone: Tz) -> Self {
        Self::containing(chrono::Utc::now().with_timezone(&timezone).date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => TRANSACTION_TYPE_INCOME,
            TransactionType::Expense => TRANSACTION_TYPE_EXPENSE,
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == TRANSACTION_TYPE_INCOME => Ok(TransactionType::Income),
            s if s == TRANSACTION_TYPE_EXPENSE => Ok(TransactionType::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Domain model for a ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub transaction_date: NaiveDate,
    pub budget_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for transactions
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    pub amount: String,
    pub category: String,
    pub transaction_date: NaiveDate,
    pub budget_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn amount_decimal(&self) -> Decimal {
        self.amount.parse().unwrap_or(Decimal::ZERO)
    }
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        let amount = db.amount_decimal();
        Transaction {
            id: db.id,
            user_id: db.user_id,
            // Rows are written through TransactionType::as_str; an unknown
            // value reads as an expense so it never inflates income.
            transaction_type: db
                .transaction_type
                .parse()
                .unwrap_or(TransactionType::Expense),
            amount,
            category: db.category,
            transaction_date: db.transaction_date,
            budget_id: db.budget_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for logging a new transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub transaction_date: NaiveDate,
    pub budget_id: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> crate::errors::Result<()> {
        use crate::errors::{Error, ValidationError};
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transaction amount must be positive".to_string(),
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "category".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update for an existing transaction. Absent fields keep their
/// current values; `budgetId: null` clears the association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub budget_id: Option<Option<String>>,
}

/// Read view resolving the weak budget reference lookup-or-null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithBudget {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub budget_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_containing_mid_month() {
        let period = Period::containing(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn test_period_containing_december_rolls_year() {
        let period = Period::containing(NaiveDate::from_ymd_opt(2025, 12, 3).unwrap());
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_period_containing_leap_february() {
        let period = Period::containing(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_period_contains_bounds() {
        let period = Period::containing(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert!(period.contains(period.start));
        assert!(period.contains(period.end));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
    }

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!(
            TRANSACTION_TYPE_INCOME.parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(TransactionType::Expense.as_str(), TRANSACTION_TYPE_EXPENSE);
        assert!("REFUND".parse::<TransactionType>().is_err());
    }
}

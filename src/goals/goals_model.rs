use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

pub const GOAL_STATUS_ACTIVE: &str = "ACTIVE";
pub const GOAL_STATUS_ACHIEVED: &str = "ACHIEVED";

pub const CONTRIBUTION_SOURCE_MANUAL: &str = "MANUAL";
pub const CONTRIBUTION_SOURCE_ADVISOR: &str = "ADVISOR";
pub const CONTRIBUTION_SOURCE_MONTHLY_RESET: &str = "MONTHLY_RESET";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Active,
    Achieved,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => GOAL_STATUS_ACTIVE,
            GoalStatus::Achieved => GOAL_STATUS_ACHIEVED,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == GOAL_STATUS_ACTIVE => Ok(GoalStatus::Active),
            s if s == GOAL_STATUS_ACHIEVED => Ok(GoalStatus::Achieved),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

/// Where a goal contribution came from. All three sources flow through the
/// same add-funds path and history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionSource {
    Manual,
    Advisor,
    MonthlyReset,
}

impl ContributionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionSource::Manual => CONTRIBUTION_SOURCE_MANUAL,
            ContributionSource::Advisor => CONTRIBUTION_SOURCE_ADVISOR,
            ContributionSource::MonthlyReset => CONTRIBUTION_SOURCE_MONTHLY_RESET,
        }
    }
}

impl FromStr for ContributionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == CONTRIBUTION_SOURCE_MANUAL => Ok(ContributionSource::Manual),
            s if s == CONTRIBUTION_SOURCE_ADVISOR => Ok(ContributionSource::Advisor),
            s if s == CONTRIBUTION_SOURCE_MONTHLY_RESET => Ok(ContributionSource::MonthlyReset),
            _ => Err(format!("Unknown contribution source: {}", s)),
        }
    }
}

/// Domain model for a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub current_amount: Decimal,
    pub target_amount: Decimal,
    pub status: GoalStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SavingsGoal {
    /// A zero target means "no target"; such goals never auto-achieve.
    pub fn is_target_reached(&self) -> bool {
        self.target_amount > Decimal::ZERO && self.current_amount >= self.target_amount
    }
}

/// Database model for savings goals
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingsGoalDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub current_amount: String,
    pub target_amount: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SavingsGoalDB {
    pub fn current_amount_decimal(&self) -> Decimal {
        self.current_amount.parse().unwrap_or(Decimal::ZERO)
    }

    pub fn target_amount_decimal(&self) -> Decimal {
        self.target_amount.parse().unwrap_or(Decimal::ZERO)
    }
}

impl From<SavingsGoalDB> for SavingsGoal {
    fn from(db: SavingsGoalDB) -> Self {
        let current_amount = db.current_amount_decimal();
        let target_amount = db.target_amount_decimal();
        SavingsGoal {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            current_amount,
            target_amount,
            status: db.status.parse().unwrap_or(GoalStatus::Active),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for creating a new savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal name cannot be empty".to_string(),
            )));
        }
        if self.target_amount < Decimal::ZERO || self.current_amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal amounts cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update for an existing goal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub status: Option<GoalStatus>,
}

/// One recorded contribution to a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressEntry {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub amount: Decimal,
    pub source: ContributionSource,
    pub recorded_at: NaiveDateTime,
}

/// Database model for the goal contribution history
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goal_progress_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalProgressEntryDB {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub amount: String,
    pub source: String,
    pub recorded_at: NaiveDateTime,
}

impl From<GoalProgressEntryDB> for GoalProgressEntry {
    fn from(db: GoalProgressEntryDB) -> Self {
        let amount = db.amount.parse().unwrap_or(Decimal::ZERO);
        GoalProgressEntry {
            id: db.id,
            user_id: db.user_id,
            goal_id: db.goal_id,
            amount,
            source: db.source.parse().unwrap_or(ContributionSource::Manual),
            recorded_at: db.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(current: Decimal, target: Decimal) -> SavingsGoal {
        let now = chrono::Utc::now().naive_utc();
        SavingsGoal {
            id: "g".to_string(),
            user_id: "user-1".to_string(),
            name: "Emergency Fund".to_string(),
            current_amount: current,
            target_amount: target,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_target_reached_at_and_past_target() {
        assert!(goal(dec!(1000), dec!(1000)).is_target_reached());
        assert!(goal(dec!(1200), dec!(1000)).is_target_reached());
        assert!(!goal(dec!(999), dec!(1000)).is_target_reached());
    }

    #[test]
    fn test_zero_target_never_auto_achieves() {
        assert!(!goal(dec!(500), Decimal::ZERO).is_target_reached());
    }
}

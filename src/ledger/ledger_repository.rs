use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::ledger::ledger_model::{
    NewTransaction, Period, Transaction, TransactionDB, TransactionUpdate,
};
use crate::ledger::ledger_traits::TransactionRepositoryTrait;
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        TransactionRepository { pool }
    }

    fn load(&self, owner: &str, txn_id: &str) -> Result<TransactionDB> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::user_id.eq(owner))
            .filter(transactions::id.eq(txn_id))
            .first::<TransactionDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Transaction with id {} not found", txn_id)))
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transaction(&self, owner: &str, txn_id: &str) -> Result<Transaction> {
        Ok(self.load(owner, txn_id)?.into())
    }

    fn get_transactions(&self, owner: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(owner))
            .order((
                transactions::transaction_date.desc(),
                transactions::created_at.desc(),
            ))
            .load::<TransactionDB>(&mut conn)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn get_transactions_in_period(&self, owner: &str, period: &Period) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(owner))
            .filter(transactions::transaction_date.between(period.start, period.end))
            .order(transactions::transaction_date.asc())
            .load::<TransactionDB>(&mut conn)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn create_transaction(
        &self,
        owner: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let now = Utc::now().naive_utc();
        let row = TransactionDB {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            amount: new_transaction.amount.to_string(),
            category: new_transaction.category,
            transaction_date: new_transaction.transaction_date,
            budget_id: new_transaction.budget_id,
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(&mut conn)?;

        self.get_transaction(owner, &row.id)
    }

    async fn update_transaction(
        &self,
        owner: &str,
        txn_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let existing = self.load(owner, txn_id)?;

        let merged_type = update
            .transaction_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.transaction_type);
        let merged_amount = update
            .amount
            .map(|a| a.to_string())
            .unwrap_or(existing.amount);
        let merged_category = update.category.unwrap_or(existing.category);
        let merged_date = update.transaction_date.unwrap_or(existing.transaction_date);
        let merged_budget_id = match update.budget_id {
            Some(value) => value,
            None => existing.budget_id,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::update(
            transactions::table
                .filter(transactions::user_id.eq(owner))
                .filter(transactions::id.eq(txn_id)),
        )
        .set((
            transactions::transaction_type.eq(merged_type),
            transactions::amount.eq(merged_amount),
            transactions::category.eq(merged_category),
            transactions::transaction_date.eq(merged_date),
            transactions::budget_id.eq(merged_budget_id),
            transactions::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        self.get_transaction(owner, txn_id)
    }

    async fn delete_transaction(&self, owner: &str, txn_id: &str) -> Result<Transaction> {
        let existing: Transaction = self.load(owner, txn_id)?.into();

        let mut conn = get_connection(&self.pool)?;
        diesel::delete(
            transactions::table
                .filter(transactions::user_id.eq(owner))
                .filter(transactions::id.eq(txn_id)),
        )
        .execute(&mut conn)?;

        Ok(existing)
    }
}

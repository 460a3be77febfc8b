//! # Settlement Port Adapters
//!
//! Implements the marlin-session storage ports on top of the SQLite
//! repositories, so a [`SettlementCoordinator`] can commit against the real
//! database.
//!
//! ## Error Mapping
//! ```text
//! DbError (constraint: unique / FK / not-found)  → StoreError::Rejected
//! DbError (operational: pool, connection, query) → StoreError::Unavailable
//! ```
//! The underlying message passes through verbatim in both cases.
//!
//! [`SettlementCoordinator`]: marlin_session::SettlementCoordinator

use async_trait::async_trait;

use marlin_core::types::{Customer, PaymentRecord, Transaction};
use marlin_session::{CustomerDirectory, RecordedCollection, StoreError, TransactionStore};

use crate::error::DbError;
use crate::pool::Database;

fn store_error(err: DbError) -> StoreError {
    if err.is_rejection() {
        StoreError::Rejected(err.to_string())
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

/// [`TransactionStore`] backed by the transactions repository.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    db: Database,
}

impl SqliteTransactionStore {
    pub fn new(db: Database) -> Self {
        SqliteTransactionStore { db }
    }
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    async fn submit(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        let repo = self.db.transactions();
        repo.insert(transaction).await.map_err(store_error)?;

        // Return the stored form (collection payment lists load empty).
        repo.get(&transaction.id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| {
                StoreError::Unavailable(format!(
                    "transaction {} vanished after insert",
                    transaction.id
                ))
            })
    }

    async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError> {
        let (collection, sale) = self
            .db
            .transactions()
            .record_collection(collection, payment)
            .await
            .map_err(store_error)?;
        Ok(RecordedCollection { collection, sale })
    }
}

/// [`CustomerDirectory`] backed by the customers repository.
#[derive(Debug, Clone)]
pub struct SqliteCustomerDirectory {
    db: Database,
}

impl SqliteCustomerDirectory {
    pub fn new(db: Database) -> Self {
        SqliteCustomerDirectory { db }
    }
}

#[async_trait]
impl CustomerDirectory for SqliteCustomerDirectory {
    async fn append(&self, customer: &Customer) -> Result<(), StoreError> {
        self.db
            .customers()
            .insert(customer)
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_errors_map_to_rejected() {
        let err = store_error(DbError::UniqueViolation {
            field: "payments.id".to_string(),
        });
        assert!(matches!(err, StoreError::Rejected(_)));

        let err = store_error(DbError::PoolExhausted);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}

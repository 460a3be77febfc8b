//! Outbound ports the settlement coordinator depends on.
//!
//! Storage and printing are behind object-safe traits so the coordinator can
//! be driven against SQLite in production and in-memory fakes in tests.

use async_trait::async_trait;

use marlin_core::types::{Customer, PaymentRecord, Transaction};

/// Failure from a transaction or customer store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store understood the request and refused it (constraint
    /// violation, unknown id). Retrying the same request will fail again.
    #[error("store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or the operation failed for an
    /// operational reason. Retrying may succeed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Receipt printing failure. Printing is best-effort; this never invalidates
/// a settled transaction.
#[derive(Debug, Clone, thiserror::Error)]
#[error("receipt printing failed: {0}")]
pub struct PrintError(pub String);

/// Result of durably recording a collection: the stored collection row plus
/// the originating sale with the payment applied.
#[derive(Debug, Clone)]
pub struct RecordedCollection {
    pub collection: Transaction,
    pub sale: Transaction,
}

/// Durable home for settled transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a complete transaction (lines and payments included)
    /// atomically. Returns the stored transaction.
    async fn submit(&self, transaction: &Transaction) -> Result<Transaction, StoreError>;

    /// Records a debt collection as one all-or-nothing operation: `payment`
    /// lands on the ledger of the sale named by
    /// `collection.related_transaction_id` and `collection` is stored, or
    /// neither happens. A failed call leaves no trace, so retrying it never
    /// double-counts the payment.
    async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError>;
}

/// Durable home for customers.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Registers a new customer record.
    async fn append(&self, customer: &Customer) -> Result<(), StoreError>;
}

/// Physical or virtual receipt printer.
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    async fn print(&self, transaction: &Transaction) -> Result<(), PrintError>;
}

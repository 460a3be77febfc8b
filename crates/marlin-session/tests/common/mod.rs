//! In-memory fakes for the storage and printing ports, shared across the
//! settlement integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;
use tokio::sync::Notify;

use marlin_core::pricing::{price_line, LineConfig, PricedLine};
use marlin_core::types::{
    CatalogItem, Customer, PaymentRecord, PricingMethod, Transaction,
};
use marlin_core::{Cart, Money};
use marlin_session::{
    CustomerDirectory, PrintError, ReceiptPrinter, RecordedCollection, StoreError,
    TransactionStore,
};

// =============================================================================
// Cart Builders
// =============================================================================

pub fn fixed_line(name: &str, price: rust_decimal::Decimal) -> PricedLine {
    let item = CatalogItem {
        id: format!("item-{name}"),
        name: name.to_string(),
        category: "Test".to_string(),
        pricing_method: PricingMethod::Fixed,
        price: Money::new(price),
        services: Vec::new(),
        is_variable: false,
    };
    price_line(Some(&item), &LineConfig::plain()).unwrap()
}

/// A cart holding one 12.50 row and one 7.50 row, total 20.00.
pub fn sample_cart() -> Cart {
    let mut cart = Cart::new();
    cart.push(fixed_line("Banner", dec!(12.50))).unwrap();
    cart.push(fixed_line("Mug", dec!(7.50))).unwrap();
    cart
}

// =============================================================================
// Transaction Store Fakes
// =============================================================================

/// Accepts everything and keeps it in a map, like the SQLite store but
/// without the SQLite.
#[derive(Default)]
pub struct MemoryStore {
    transactions: Mutex<HashMap<String, Transaction>>,
}

impl MemoryStore {
    pub fn stored(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().values().cloned().collect()
    }

    pub fn stored_count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn submit(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        self.transactions
            .lock()
            .unwrap()
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction.clone())
    }

    async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError> {
        let mut transactions = self.transactions.lock().unwrap();
        let sale_id = collection
            .related_transaction_id
            .clone()
            .ok_or_else(|| StoreError::Rejected("collection not linked to a sale".to_string()))?;
        let sale = transactions
            .get_mut(&sale_id)
            .ok_or_else(|| StoreError::Rejected(format!("no transaction {sale_id}")))?;
        sale.register_payment(payment.clone());
        let sale = sale.clone();
        transactions.insert(collection.id.clone(), collection.clone());
        Ok(RecordedCollection {
            collection: collection.clone(),
            sale,
        })
    }
}

/// Refuses every write, simulating a constraint violation.
pub struct RejectingStore;

#[async_trait]
impl TransactionStore for RejectingStore {
    async fn submit(&self, _transaction: &Transaction) -> Result<Transaction, StoreError> {
        Err(StoreError::Rejected("UNIQUE constraint failed".to_string()))
    }

    async fn record_collection(
        &self,
        _collection: &Transaction,
        _payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError> {
        Err(StoreError::Rejected("UNIQUE constraint failed".to_string()))
    }
}

/// Parks inside `submit` until released, so tests can observe the
/// coordinator while a commit is genuinely in flight.
#[derive(Default)]
pub struct BlockingStore {
    pub entered: Notify,
    pub release: Notify,
    inner: MemoryStore,
}

#[async_trait]
impl TransactionStore for BlockingStore {
    async fn submit(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.submit(transaction).await
    }

    async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError> {
        self.inner.record_collection(collection, payment).await
    }
}

/// Fails the first collection recording without storing anything, then
/// behaves like [`MemoryStore`]. Lets tests retry a collection after an
/// outage and check nothing was double-counted.
#[derive(Default)]
pub struct FlakyCollectionStore {
    inner: MemoryStore,
    tripped: std::sync::atomic::AtomicBool,
}

impl FlakyCollectionStore {
    pub fn stored(&self) -> Vec<Transaction> {
        self.inner.stored()
    }

    pub fn stored_count(&self) -> usize {
        self.inner.stored_count()
    }
}

#[async_trait]
impl TransactionStore for FlakyCollectionStore {
    async fn submit(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        self.inner.submit(transaction).await
    }

    async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> Result<RecordedCollection, StoreError> {
        if !self
            .tripped
            .swap(true, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StoreError::Unavailable("disk I/O error".to_string()));
        }
        self.inner.record_collection(collection, payment).await
    }
}

// =============================================================================
// Customer Directory / Printer Fakes
// =============================================================================

#[derive(Default)]
pub struct MemoryDirectory {
    customers: Mutex<Vec<Customer>>,
}

impl MemoryDirectory {
    pub fn registered(&self) -> Vec<Customer> {
        self.customers.lock().unwrap().clone()
    }
}

#[async_trait]
impl CustomerDirectory for MemoryDirectory {
    async fn append(&self, customer: &Customer) -> Result<(), StoreError> {
        self.customers.lock().unwrap().push(customer.clone());
        Ok(())
    }
}

pub struct NullPrinter;

#[async_trait]
impl ReceiptPrinter for NullPrinter {
    async fn print(&self, _transaction: &Transaction) -> Result<(), PrintError> {
        Ok(())
    }
}

pub struct FailingPrinter;

#[async_trait]
impl ReceiptPrinter for FailingPrinter {
    async fn print(&self, _transaction: &Transaction) -> Result<(), PrintError> {
        Err(PrintError("printer offline".to_string()))
    }
}

// keep clippy quiet about helpers unused by a given test binary
#[allow(dead_code)]
pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

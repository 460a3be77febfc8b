//! End-to-end ledger tests: settle through the real SQLite-backed ports,
//! read back, and fold a period report from what was stored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use marlin_core::pricing::{price_line, LineConfig};
use marlin_core::report::report;
use marlin_core::types::{
    CatalogItem, Dimensions, Expense, PaymentMethod, PaymentRecord, PricingMethod, Transaction,
    TransactionKind,
};
use marlin_core::{Cart, Money};
use marlin_db::{Database, DbConfig, SqliteCustomerDirectory, SqliteTransactionStore};
use marlin_session::{
    CustomerChoice, PrintError, ReceiptPrinter, SettleRequest, SettlementCoordinator,
};

struct NullPrinter;

#[async_trait]
impl ReceiptPrinter for NullPrinter {
    async fn print(&self, _transaction: &Transaction) -> Result<(), PrintError> {
        Ok(())
    }
}

async fn open_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn coordinator(db: &Database) -> SettlementCoordinator {
    SettlementCoordinator::new(
        Arc::new(SqliteTransactionStore::new(db.clone())),
        Arc::new(SqliteCustomerDirectory::new(db.clone())),
        Arc::new(NullPrinter),
    )
}

fn banner_item(rate: rust_decimal::Decimal) -> CatalogItem {
    CatalogItem {
        id: "item-banner".to_string(),
        name: "Flex Banner".to_string(),
        category: "Large Format".to_string(),
        pricing_method: PricingMethod::Area,
        price: Money::new(rate),
        services: Vec::new(),
        is_variable: false,
    }
}

fn banner_cart() -> Cart {
    // 1.37 × 2.5 at 11.25/unit-area = 38.53125, exact.
    let mut config = LineConfig::plain();
    config.dimensions = Some(Dimensions::new(dec!(1.37), dec!(2.5)));
    let line = price_line(Some(&banner_item(dec!(11.25))), &config).unwrap();

    let mut cart = Cart::new();
    cart.push(line).unwrap();
    cart
}

fn request(method: PaymentMethod, name: &str, down: Option<&str>) -> SettleRequest {
    SettleRequest {
        payment_method: method,
        customer: CustomerChoice::New {
            name: name.to_string(),
        },
        down_payment: down.map(str::to_string),
        print_receipt: false,
    }
}

#[tokio::test]
async fn test_sale_roundtrip_preserves_exact_decimals() {
    let db = open_db().await;
    let coordinator = coordinator(&db);

    let stored = coordinator
        .settle(&banner_cart(), request(PaymentMethod::Cash, "Ayesha", None))
        .await
        .unwrap()
        .transaction;

    let reloaded = db.transactions().get(&stored.id).await.unwrap().unwrap();

    // Full precision survives the TEXT column; only Display rounds.
    assert_eq!(reloaded.total, Money::new(dec!(38.53125)));
    assert_eq!(reloaded.total.to_string(), "38.53");
    assert_eq!(reloaded.lines.len(), 1);
    assert_eq!(reloaded.lines[0].unit_price, Money::new(dec!(38.53125)));
    assert_eq!(
        reloaded.lines[0].dimensions,
        Some(Dimensions::new(dec!(1.37), dec!(2.5)))
    );
    assert_eq!(reloaded.payments.len(), 1);
    assert!(reloaded.is_paid());
    assert_eq!(reloaded, stored);

    // The walk-in customer landed in the directory.
    let customer = db
        .customers()
        .get_by_id(&reloaded.customer_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.name, "Ayesha");
}

#[tokio::test]
async fn test_collection_updates_sale_and_links_back() {
    let db = open_db().await;
    let coordinator = coordinator(&db);

    let sale = coordinator
        .settle(
            &banner_cart(),
            request(PaymentMethod::Credit, "Bilal", Some("10")),
        )
        .await
        .unwrap()
        .transaction;
    assert_eq!(sale.outstanding_debt(), Money::new(dec!(28.53125)));

    let collection = coordinator
        .collect(&sale, Money::new(dec!(28.53125)), PaymentMethod::Cash, false)
        .await
        .unwrap()
        .transaction;

    assert_eq!(collection.kind, TransactionKind::Collection);
    assert_eq!(collection.related_transaction_id, Some(sale.id.clone()));

    let reloaded_sale = db.transactions().get(&sale.id).await.unwrap().unwrap();
    assert_eq!(reloaded_sale.payments.len(), 2);
    assert!(reloaded_sale.is_paid());
    assert!(reloaded_sale.outstanding_debt().is_zero());
}

#[tokio::test]
async fn test_failed_collection_write_rolls_back_the_payment() {
    let db = open_db().await;
    let coordinator = coordinator(&db);

    let sale = coordinator
        .settle(
            &banner_cart(),
            request(PaymentMethod::Credit, "Bilal", Some("10")),
        )
        .await
        .unwrap()
        .transaction;

    // Reuse the sale's id for the collection row: the payment insert
    // succeeds, the transactions insert hits the primary key, and the
    // whole write must roll back.
    let payment = PaymentRecord::new(Money::new(dec!(15)), PaymentMethod::Cash);
    let mut collection = Transaction::new_collection(&sale, payment.clone());
    collection.id = sale.id.clone();
    assert!(db
        .transactions()
        .record_collection(&collection, &payment)
        .await
        .is_err());

    let reloaded = db.transactions().get(&sale.id).await.unwrap().unwrap();
    assert_eq!(reloaded.payments.len(), 1);
    assert_eq!(reloaded.outstanding_debt(), Money::new(dec!(28.53125)));

    // A clean retry records the payment exactly once.
    coordinator
        .collect(&sale, Money::new(dec!(15)), PaymentMethod::Cash, false)
        .await
        .unwrap();
    let reloaded = db.transactions().get(&sale.id).await.unwrap().unwrap();
    assert_eq!(reloaded.payments.len(), 2);
    assert_eq!(reloaded.outstanding_debt(), Money::new(dec!(13.53125)));
}

#[tokio::test]
async fn test_period_report_folds_stored_ledger() {
    let db = open_db().await;
    let coordinator = coordinator(&db);

    coordinator
        .settle(&banner_cart(), request(PaymentMethod::Cash, "Ayesha", None))
        .await
        .unwrap();
    let credit_sale = coordinator
        .settle(
            &banner_cart(),
            request(PaymentMethod::Credit, "Bilal", Some("10")),
        )
        .await
        .unwrap()
        .transaction;
    coordinator
        .collect(&credit_sale, Money::new(dec!(5)), PaymentMethod::Cash, false)
        .await
        .unwrap();

    let expense = Expense::new("ink refill", Money::new(dec!(7.5)));
    db.expenses().insert(&expense).await.unwrap();

    let start = Utc::now() - Duration::hours(1);
    let end = Utc::now() + Duration::hours(1);
    let transactions = db.transactions().list_between(start, end).await.unwrap();
    let expenses = db.expenses().list_between(start, end).await.unwrap();

    // Two sales plus the collection audit record.
    assert_eq!(transactions.len(), 3);

    let totals = report(&transactions, &expenses);
    assert_eq!(totals.sales, Money::new(dec!(77.0625)));
    assert_eq!(totals.collected_cash, Money::new(dec!(43.53125)));
    assert_eq!(totals.collected_credit, Money::new(dec!(10)));
    assert_eq!(
        totals.collected,
        totals.collected_cash + totals.collected_wallet + totals.collected_credit
    );
    assert_eq!(totals.debt, Money::new(dec!(23.53125)));
    assert_eq!(totals.expenses, Money::new(dec!(7.5)));
    assert_eq!(totals.cash_balance, Money::new(dec!(46.03125)));
}

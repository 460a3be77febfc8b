//! # Transaction Repository
//!
//! Database operations for transactions, their frozen line snapshots, and
//! their payment ledgers.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ insert(transaction)                 one SQLite transaction          │
//! │                                                                     │
//! │   INSERT transactions row                                           │
//! │   INSERT transaction_lines × N      (position = receipt order)      │
//! │   INSERT payments × M               (sales only)                    │
//! │   COMMIT                                                            │
//! │                                                                     │
//! │ Partial writes are impossible: a failed line or payment insert      │
//! │ rolls the whole transaction back.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collection Payments
//! A collection's payment record is stored against the *originating sale*,
//! never duplicated under the collection row. Both writes happen in one
//! SQLite transaction (via [`TransactionRepository::record_collection`]), so
//! a failed collection leaves the sale's ledger untouched. The collection
//! row itself carries the amount in `total` and the method in
//! `payment_method`; its own payment list loads empty.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use marlin_core::types::{
    Dimensions, PaymentMethod, PaymentRecord, Service, Transaction, TransactionKind,
    TransactionLine,
};

use crate::error::{DbError, DbResult};
use crate::repository::{decimal_text, money_column, money_text, optional_decimal_column};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a complete transaction (lines and payments included)
    /// atomically.
    pub async fn insert(&self, transaction: &Transaction) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            kind = ?transaction.kind,
            total = %transaction.total,
            "Inserting transaction"
        );

        let mut tx = self.pool.begin().await?;
        insert_transaction(&mut tx, transaction).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Gets a transaction by ID, lines and payments included.
    pub async fn get(&self, id: &str) -> DbResult<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, kind, created_at, customer_id, customer_name,
                   item_count, total, payment_method, related_transaction_id
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    /// Lists transactions in `[start, end)`, oldest first, lines and
    /// payments included.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, created_at, customer_id, customer_name,
                   item_count, total, payment_method, related_transaction_id
            FROM transactions
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in &rows {
            transactions.push(self.hydrate(row).await?);
        }
        Ok(transactions)
    }

    /// Records a collection atomically: the payment lands on the originating
    /// sale's ledger and the collection row is stored, in one SQLite
    /// transaction. A failure on either insert rolls back both, so a failed
    /// call leaves the sale exactly as it was.
    ///
    /// Returns the stored collection and the updated sale. Rejects
    /// collections whose linked sale doesn't exist or points at another
    /// collection.
    pub async fn record_collection(
        &self,
        collection: &Transaction,
        payment: &PaymentRecord,
    ) -> DbResult<(Transaction, Transaction)> {
        let sale_id = collection
            .related_transaction_id
            .as_deref()
            .ok_or_else(|| DbError::not_found("Sale", "(unlinked collection)"))?;

        debug!(
            collection_id = %collection.id,
            sale_id = %sale_id,
            amount = %payment.amount,
            "Recording collection"
        );

        let sale = self
            .get(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))?;
        if sale.kind != TransactionKind::Sale {
            return Err(DbError::not_found("Sale", sale_id));
        }

        let mut tx = self.pool.begin().await?;
        insert_payment(&mut tx, sale_id, payment).await?;
        insert_transaction(&mut tx, collection).await?;
        tx.commit().await?;

        let stored = self
            .get(&collection.id)
            .await?
            .ok_or_else(|| DbError::not_found("Collection", &collection.id))?;
        let updated_sale = self
            .get(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))?;
        Ok((stored, updated_sale))
    }

    async fn hydrate(&self, row: &SqliteRow) -> DbResult<Transaction> {
        let id: String = row.try_get("id")?;
        let total: String = row.try_get("total")?;

        let lines = self.lines_for(&id).await?;
        let payments = self.payments_for(&id).await?;

        Ok(Transaction {
            id,
            kind: row.try_get::<TransactionKind, _>("kind")?,
            created_at: row.try_get("created_at")?,
            customer_id: row.try_get("customer_id")?,
            customer_name: row.try_get("customer_name")?,
            item_count: row.try_get("item_count")?,
            total: money_column("transactions.total", &total)?,
            payment_method: row.try_get::<PaymentMethod, _>("payment_method")?,
            lines,
            payments,
            related_transaction_id: row.try_get("related_transaction_id")?,
        })
    }

    async fn lines_for(&self, transaction_id: &str) -> DbResult<Vec<TransactionLine>> {
        let rows = sqlx::query(
            r#"
            SELECT id, catalog_item_id, name, unit_price, quantity, line_total,
                   width, height, waste_width, waste_height, services
            FROM transaction_lines
            WHERE transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_line).collect()
    }

    async fn payments_for(&self, transaction_id: &str) -> DbResult<Vec<PaymentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, amount, method, created_at
            FROM payments
            WHERE transaction_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PaymentRecord {
                    id: row.try_get("id")?,
                    amount: money_column("payments.amount", row.try_get("amount")?)?,
                    method: row.try_get::<PaymentMethod, _>("method")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}

/// Writes the transaction row, its line snapshots, and (for sales) its
/// payment records inside the caller's SQLite transaction.
async fn insert_transaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    transaction: &Transaction,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, kind, created_at, customer_id, customer_name,
            item_count, total, payment_method, related_transaction_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&transaction.id)
    .bind(transaction.kind)
    .bind(transaction.created_at)
    .bind(&transaction.customer_id)
    .bind(&transaction.customer_name)
    .bind(transaction.item_count)
    .bind(money_text(transaction.total))
    .bind(transaction.payment_method)
    .bind(&transaction.related_transaction_id)
    .execute(&mut **tx)
    .await?;

    for (position, line) in transaction.lines.iter().enumerate() {
        let services_json = serde_json::to_string(&line.services)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO transaction_lines (
                id, transaction_id, catalog_item_id, name,
                unit_price, quantity, line_total,
                width, height, waste_width, waste_height,
                services, position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&line.id)
        .bind(&transaction.id)
        .bind(&line.catalog_item_id)
        .bind(&line.name)
        .bind(money_text(line.unit_price))
        .bind(line.quantity)
        .bind(money_text(line.line_total))
        .bind(line.dimensions.map(|d| decimal_text(d.width)))
        .bind(line.dimensions.map(|d| decimal_text(d.height)))
        .bind(line.waste.map(|d| decimal_text(d.width)))
        .bind(line.waste.map(|d| decimal_text(d.height)))
        .bind(services_json)
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }

    if transaction.kind == TransactionKind::Sale {
        for payment in &transaction.payments {
            insert_payment(tx, &transaction.id, payment).await?;
        }
    }

    Ok(())
}

async fn insert_payment(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    transaction_id: &str,
    payment: &PaymentRecord,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (id, transaction_id, amount, method, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&payment.id)
    .bind(transaction_id)
    .bind(money_text(payment.amount))
    .bind(payment.method)
    .bind(payment.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn decode_line(row: &SqliteRow) -> DbResult<TransactionLine> {
    let unit_price: String = row.try_get("unit_price")?;
    let line_total: String = row.try_get("line_total")?;
    let services_json: String = row.try_get("services")?;

    let services: Vec<Service> = serde_json::from_str(&services_json)
        .map_err(|e| DbError::corrupt("transaction_lines.services", e.to_string()))?;

    Ok(TransactionLine {
        id: row.try_get("id")?,
        catalog_item_id: row.try_get("catalog_item_id")?,
        name: row.try_get("name")?,
        unit_price: money_column("transaction_lines.unit_price", &unit_price)?,
        quantity: row.try_get("quantity")?,
        line_total: money_column("transaction_lines.line_total", &line_total)?,
        dimensions: decode_dimensions(row, "width", "height")?,
        waste: decode_dimensions(row, "waste_width", "waste_height")?,
        services,
    })
}

fn decode_dimensions(
    row: &SqliteRow,
    width_column: &str,
    height_column: &str,
) -> DbResult<Option<Dimensions>> {
    let width = optional_decimal_column(width_column, row.try_get(width_column)?)?;
    let height = optional_decimal_column(height_column, row.try_get(height_column)?)?;

    match (width, height) {
        (Some(width), Some(height)) => Ok(Some(Dimensions::new(width, height))),
        (None, None) => Ok(None),
        _ => Err(DbError::corrupt(
            width_column,
            "width/height pair is half NULL",
        )),
    }
}

//! # Expense Repository
//!
//! Database operations for the expense ledger.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use marlin_core::types::Expense;

use crate::error::DbResult;
use crate::repository::{money_column, money_text};

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts an expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(id = %expense.id, title = %expense.title, amount = %expense.amount, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, title, amount, date, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.title)
        .bind(money_text(expense.amount))
        .bind(expense.date)
        .bind(&expense.notes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists expenses in `[start, end)`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, amount, date, notes
            FROM expenses
            WHERE date >= ?1 AND date < ?2
            ORDER BY date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_expense).collect()
    }
}

fn decode_expense(row: &SqliteRow) -> DbResult<Expense> {
    let amount: String = row.try_get("amount")?;
    Ok(Expense {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        amount: money_column("expenses.amount", &amount)?,
        date: row.try_get("date")?,
        notes: row.try_get("notes")?,
    })
}

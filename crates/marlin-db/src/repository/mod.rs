//! # Repository Module
//!
//! Database repository implementations for Marlin POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The Repository pattern keeps SQL behind a typed API.               │
//! │                                                                     │
//! │  Caller                                                             │
//! │    │  db.transactions().get("...")                                  │
//! │    ▼                                                                │
//! │  TransactionRepository                                              │
//! │    ├── insert(&self, transaction)                                   │
//! │    ├── get(&self, id)                                               │
//! │    ├── list_between(&self, start, end)                              │
//! │    └── record_collection(&self, collection, payment)                │
//! │    │  SQL                                                           │
//! │    ▼                                                                │
//! │  SQLite                                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Catalog items and their services
//! - [`customer::CustomerRepository`] - Customer directory
//! - [`transaction::TransactionRepository`] - Transactions, lines, payments
//! - [`expense::ExpenseRepository`] - Expense ledger

pub mod catalog;
pub mod customer;
pub mod expense;
pub mod transaction;

use rust_decimal::Decimal;
use std::str::FromStr;

use marlin_core::Money;

use crate::error::{DbError, DbResult};

// =============================================================================
// Column Codecs
// =============================================================================
//
// Money and dimensions are stored as exact decimal TEXT. Encoding goes
// through the raw decimal (never Display, which rounds for humans).

pub(crate) fn money_text(money: Money) -> String {
    money.amount().to_string()
}

pub(crate) fn decimal_text(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn money_column(column: &str, raw: &str) -> DbResult<Money> {
    decimal_column(column, raw).map(Money::new)
}

pub(crate) fn decimal_column(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| DbError::corrupt(column, e.to_string()))
}

pub(crate) fn optional_decimal_column(
    column: &str,
    raw: Option<&str>,
) -> DbResult<Option<Decimal>> {
    raw.map(|r| decimal_column(column, r)).transpose()
}

//! # marlin-db: Database Layer for Marlin POS
//!
//! SQLite persistence for the Marlin POS system, plus the adapters that
//! plug it into the settlement ports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Marlin POS Data Flow                           │
//! │                                                                     │
//! │  SettlementCoordinator (marlin-session)                             │
//! │       │  TransactionStore / CustomerDirectory ports                 │
//! │       ▼                                                             │
//! │  ┌────────────────────────────────────────────────────────────┐    │
//! │  │                  marlin-db (THIS CRATE)                    │    │
//! │  │                                                            │    │
//! │  │  ┌────────────┐   ┌───────────────┐   ┌───────────────┐   │    │
//! │  │  │  Database  │   │ Repositories  │   │  Migrations   │   │    │
//! │  │  │ (pool.rs)  │◄──│ catalog/      │   │  (embedded)   │   │    │
//! │  │  │ SqlitePool │   │ customer/     │   │ 001_init.sql  │   │    │
//! │  │  │ WAL mode   │   │ transaction/  │   │               │   │    │
//! │  │  └────────────┘   │ expense       │   └───────────────┘   │    │
//! │  │                   └───────────────┘                       │    │
//! │  │  ┌──────────────────────────────────────────────────────┐ │    │
//! │  │  │  store.rs: SqliteTransactionStore,                   │ │    │
//! │  │  │            SqliteCustomerDirectory (port adapters)   │ │    │
//! │  │  └──────────────────────────────────────────────────────┘ │    │
//! │  └────────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use marlin_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/marlin.db")).await?;
//! let items = db.catalog().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{SqliteCustomerDirectory, SqliteTransactionStore};

pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::transaction::TransactionRepository;

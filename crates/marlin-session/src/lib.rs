//! # Marlin Session
//!
//! The async layer between the pure pricing/cart logic in `marlin-core` and
//! whatever persists the result. It owns two jobs:
//!
//! - **Settlement coordination** ([`SettlementCoordinator`]): turn a cart
//!   into a stored transaction exactly once, behind a single-in-flight
//!   guard, talking to storage and the receipt printer only through ports.
//! - **Live session state** ([`SaleSession`]): the shared, mutex-guarded
//!   cart a register mutates between settlements.
//!
//! ```text
//! ┌──────────────┐   with_cart_mut    ┌──────────────┐
//! │  SaleSession │ ◄───────────────── │  register UI │
//! │  Arc<Mutex<  │                    └──────────────┘
//! │    Cart >>   │
//! └──────┬───────┘
//!        │ settle(request)
//!        ▼
//! ┌──────────────────────┐   submit    ┌──────────────────┐
//! │ SettlementCoordinator│ ──────────► │ TransactionStore │
//! │  (single in flight)  │   print     ├──────────────────┤
//! │                      │ ──────────► │ ReceiptPrinter   │
//! └──────────────────────┘             └──────────────────┘
//! ```

pub mod error;
pub mod ports;
pub mod session;
pub mod settle;

pub use error::{SettleError, SettleResult};
pub use ports::{
    CustomerDirectory, PrintError, ReceiptPrinter, RecordedCollection, StoreError,
    TransactionStore,
};
pub use session::SaleSession;
pub use settle::{CustomerChoice, SettleOutcome, SettleRequest, SettlementCoordinator};

//! # marlin-core: Pure Business Logic for Marlin POS
//!
//! This crate is the **heart** of Marlin POS. It turns a catalog item plus a
//! sale-time configuration into a priced line, aggregates priced lines into a
//! cart total, and derives ledger report totals from persisted transactions.
//! Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Marlin POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              Presentation / CLI driver (out of scope)         │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                 marlin-session (coordinator)                  │ │
//! │  │      SaleSession, SettlementCoordinator, store ports          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │               ★ marlin-core (THIS CRATE) ★                    │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────┐ ┌────────┐ ┌──────────┐  │ │
//! │  │  │  money  │ │ pricing │ │  cart  │ │ report │ │validation│  │ │
//! │  │  └─────────┘ └─────────┘ └────────┘ └────────┘ └──────────┘  │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, Transaction, PaymentRecord, ...)
//! - [`money`] - Exact-decimal Money type (no floating point!)
//! - [`pricing`] - The pricing calculator: catalog item + config → priced line
//! - [`cart`] - The cart aggregator: ordered priced lines, derived totals
//! - [`report`] - The ledger report aggregator over persisted transactions
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **Derived Totals**: `unit_price` and `total_amount` are recomputed from
//!    configuration, never cached independently of it
//! 3. **Exact Decimals**: monetary values carry full precision; rounding
//!    happens only at display time
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price_line, LineConfig, LinePricing, PricedLine};
pub use report::{report, ReportTotals};
pub use types::*;

/// Maximum lines allowed in a single cart.
///
/// Prevents runaway carts and keeps receipts to a reasonable size.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

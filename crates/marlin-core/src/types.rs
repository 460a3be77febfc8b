//! # Domain Types
//!
//! Core domain types used throughout Marlin POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │  CatalogItem   │   │  Transaction   │   │ PaymentRecord  │       │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │       │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │       │
//! │  │  pricing_method│   │  kind          │   │  method        │       │
//! │  │  price         │   │  total         │   │  amount        │       │
//! │  │  services      │   │  lines (frozen)│   │  created_at    │       │
//! │  │  is_variable   │   │  payments      │   └────────────────┘       │
//! │  └────────────────┘   └────────────────┘                            │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │ PricingMethod  │   │TransactionKind │   │ PaymentMethod  │       │
//! │  │  Fixed | Area  │   │Sale|Collection │   │ Cash | Mobile  │       │
//! │  └────────────────┘   └────────────────┘   │ Wallet | Credit│       │
//! │                                            └────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A transaction freezes a by-value copy of everything it sold (line names,
//! unit prices, dimensions, service copies). Later catalog edits never
//! retroactively change historical transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Pricing Method
// =============================================================================

/// How a catalog item's `price` field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    /// Flat unit price.
    Fixed,
    /// Price per unit area; the sale-time configuration supplies dimensions.
    Area,
}

// =============================================================================
// Catalog
// =============================================================================

/// A flat-priced add-on service attached to a catalog item.
///
/// Immutable once attached; cart lines hold by-value *copies* of selected
/// services, never references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// An item available for sale. Owned by the catalog; read-only to the
/// pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the operator and on receipts.
    pub name: String,

    /// Category the item is filed under.
    pub category: String,

    /// How `price` is interpreted.
    pub pricing_method: PricingMethod,

    /// Flat unit price (`Fixed`) or price per unit area (`Area`).
    pub price: Money,

    /// Ordered add-on services this item offers.
    pub services: Vec<Service>,

    /// Variable items get their name and price from the operator at sale
    /// time instead of the catalog.
    pub is_variable: bool,
}

impl CatalogItem {
    /// Looks up an offered service by id.
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }
}

// =============================================================================
// Dimensions
// =============================================================================

/// A width × height pair for area-priced lines, in the shop's unit of
/// measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Decimal,
    pub height: Decimal,
}

impl Dimensions {
    pub const fn new(width: Decimal, height: Decimal) -> Self {
        Dimensions { width, height }
    }

    /// Covered area, exact.
    #[inline]
    pub fn area(&self) -> Decimal {
        self.width * self.height
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer in the directory. The settlement flow requires a resolved
/// customer for every transaction, cash or credit alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub notes: Option<String>,
}

impl Customer {
    /// Builds a new directory entry from operator-entered free text:
    /// a name with an empty phone.
    pub fn walk_in(name: impl Into<String>) -> Self {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            phone: String::new(),
            notes: None,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Mobile wallet transfer.
    MobileWallet,
    /// Sale made on credit; the same tag marks payment records collected
    /// against that credit.
    Credit,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::MobileWallet => "mobile_wallet",
            PaymentMethod::Credit => "credit",
        }
    }
}

// =============================================================================
// Transaction Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A committed cart.
    Sale,
    /// A later payment recorded against a prior sale's debt; links back via
    /// `related_transaction_id`.
    Collection,
}

// =============================================================================
// Payment Record
// =============================================================================

/// A single payment towards a transaction. Amount is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(amount: Money, method: PaymentMethod) -> Self {
        PaymentRecord {
            id: Uuid::new_v4().to_string(),
            amount,
            method,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Transaction Line
// =============================================================================

/// An immutable snapshot of one priced cart row at the moment of settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub id: String,

    /// Catalog item the row came from; `None` for fully improvised lines.
    pub catalog_item_id: Option<String>,

    /// Name at time of sale (frozen).
    pub name: String,

    /// Per-unit price at time of sale, services and area included (frozen).
    pub unit_price: Money,

    pub quantity: i64,

    /// `unit_price × quantity` (frozen).
    pub line_total: Money,

    /// Main dimensions for area-priced rows.
    pub dimensions: Option<Dimensions>,

    /// Wasted-material dimensions, when waste was charged.
    pub waste: Option<Dimensions>,

    /// By-value copies of the selected services.
    pub services: Vec<Service>,
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed transaction record.
///
/// Once created, the line snapshot and `total` are immutable; only the
/// payment list may grow (via later collections). Paid-ness and outstanding
/// debt are always derived from the payment list, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub customer_id: String,
    /// Customer name at time of sale (frozen).
    pub customer_name: String,
    /// Number of cart rows sold (zero for collections).
    pub item_count: i64,
    pub total: Money,
    /// Primary payment method the transaction was settled with.
    pub payment_method: PaymentMethod,
    /// Frozen line snapshot; empty for collections.
    pub lines: Vec<TransactionLine>,
    /// Ordered payment history. May grow; each entry is positive.
    pub payments: Vec<PaymentRecord>,
    /// For collections: the sale this payment was collected against.
    pub related_transaction_id: Option<String>,
}

impl Transaction {
    /// Builds a sale from a frozen line snapshot.
    pub fn new_sale(
        customer: &Customer,
        payment_method: PaymentMethod,
        lines: Vec<TransactionLine>,
        total: Money,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Sale,
            created_at: Utc::now(),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            item_count: lines.len() as i64,
            total,
            payment_method,
            lines,
            payments: Vec::new(),
            related_transaction_id: None,
        }
    }

    /// Builds a collection recording `payment` against a prior sale.
    pub fn new_collection(sale: &Transaction, payment: PaymentRecord) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            kind: TransactionKind::Collection,
            created_at: Utc::now(),
            customer_id: sale.customer_id.clone(),
            customer_name: sale.customer_name.clone(),
            item_count: 0,
            total: payment.amount,
            payment_method: payment.method,
            lines: Vec::new(),
            payments: vec![payment],
            related_transaction_id: Some(sale.id.clone()),
        }
    }

    /// Sum of all recorded payments.
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| &p.amount).sum()
    }

    /// `max(0, total − paid)`. Overpayment is data, not an error: the
    /// excess never turns debt negative.
    pub fn outstanding_debt(&self) -> Money {
        (self.total - self.total_paid()).clamp_non_negative()
    }

    /// A transaction is paid exactly when its outstanding debt is zero.
    pub fn is_paid(&self) -> bool {
        self.outstanding_debt().is_zero()
    }

    /// Appends a payment. The only permitted mutation: lines and total are
    /// frozen at creation.
    pub fn register_payment(&mut self, payment: PaymentRecord) {
        self.payments.push(payment);
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded business expense. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Expense {
    pub fn new(title: impl Into<String>, amount: Money) -> Self {
        Expense {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            amount,
            date: Utc::now(),
            notes: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

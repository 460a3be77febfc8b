//! # Settlement Coordinator
//!
//! Converts a cart into a stored transaction exactly once.
//!
//! ## Settlement Flow
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ settle(cart, request)                                             │
//! │                                                                   │
//! │  1. acquire single-in-flight guard ── busy? ──► AlreadyInFlight   │
//! │  2. reject empty cart                                             │
//! │  3. resolve customer (existing │ new walk-in via directory)       │
//! │  4. freeze cart rows into snapshots, derive total                 │
//! │  5. build initial payment record                                  │
//! │       credit: down payment (lenient parse, may be zero ─► none)   │
//! │       cash / wallet: full total                                   │
//! │  6. store.submit(transaction)  ── error? ──► cart untouched,      │
//! │                                              guard released       │
//! │  7. best-effort receipt print (failure reported, never fatal)     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guard is released by a drop guard on every exit path, success or
//! failure, so a failed settlement never wedges the register.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use marlin_core::types::{Customer, PaymentMethod, PaymentRecord, Transaction, TransactionKind};
use marlin_core::validation::{
    validate_customer_name, validate_operator_price, validate_payment_amount,
};
use marlin_core::{Cart, CoreError, Money, ValidationError};

use crate::error::{SettleError, SettleResult};
use crate::ports::{CustomerDirectory, PrintError, ReceiptPrinter, TransactionStore};

// =============================================================================
// Request / Outcome
// =============================================================================

/// Who the sale is for.
#[derive(Debug, Clone)]
pub enum CustomerChoice {
    /// An already-registered customer.
    Existing(Customer),
    /// A walk-in; a customer record is created and registered during
    /// settlement. A blank name is rejected before anything is stored.
    New { name: String },
}

/// Everything the operator decided at the payment screen.
#[derive(Debug, Clone)]
pub struct SettleRequest {
    pub payment_method: PaymentMethod,
    pub customer: CustomerChoice,
    /// Raw down-payment input for credit sales. Unparseable or negative
    /// input degrades to zero rather than blocking the sale.
    pub down_payment: Option<String>,
    pub print_receipt: bool,
}

/// A settled transaction plus anything non-fatal that went wrong after it
/// was durably stored.
#[derive(Debug)]
pub struct SettleOutcome {
    pub transaction: Transaction,
    /// Set when the receipt printer failed. The transaction is still valid.
    pub print_failure: Option<PrintError>,
}

// =============================================================================
// Single-In-Flight Guard
// =============================================================================

/// RAII release for the in-flight flag. Dropping it (any exit path,
/// including panics unwinding through `settle`) reopens the coordinator.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> SettleResult<Self> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SettleError::AlreadyInFlight);
        }
        Ok(FlightGuard { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Drives settlement and debt collection against the storage and printing
/// ports. One coordinator per register; the guard serializes its commits.
pub struct SettlementCoordinator {
    store: Arc<dyn TransactionStore>,
    customers: Arc<dyn CustomerDirectory>,
    printer: Arc<dyn ReceiptPrinter>,
    in_flight: AtomicBool,
}

impl SettlementCoordinator {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        customers: Arc<dyn CustomerDirectory>,
        printer: Arc<dyn ReceiptPrinter>,
    ) -> Self {
        SettlementCoordinator {
            store,
            customers,
            printer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a settlement or collection is currently committing.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Settles `cart` as a sale.
    ///
    /// Reads the cart but never mutates it: on any failure the caller's cart
    /// is exactly as it was, and retrying with the same cart is equivalent to
    /// the first attempt (modulo fresh transaction/payment ids).
    pub async fn settle(&self, cart: &Cart, request: SettleRequest) -> SettleResult<SettleOutcome> {
        let _guard = FlightGuard::acquire(&self.in_flight)?;

        if cart.is_empty() {
            return Err(SettleError::EmptyCart);
        }

        let customer = self.resolve_customer(&request.customer).await?;

        let lines = cart.snapshot();
        let total = cart.total_amount();
        let mut transaction =
            Transaction::new_sale(&customer, request.payment_method, lines, total);

        if let Some(payment) = initial_payment(request.payment_method, total, &request.down_payment)
        {
            transaction.register_payment(payment);
        }

        debug!(
            transaction_id = %transaction.id,
            method = request.payment_method.as_str(),
            items = transaction.item_count,
            %total,
            "submitting sale"
        );

        let stored = self.store.submit(&transaction).await?;

        info!(
            transaction_id = %stored.id,
            customer = %stored.customer_name,
            total = %stored.total,
            debt = %stored.outstanding_debt(),
            "sale settled"
        );

        let print_failure = self.print_if_requested(&stored, request.print_receipt).await;

        Ok(SettleOutcome {
            transaction: stored,
            print_failure,
        })
    }

    /// Records a debt-collection payment against a previously settled sale.
    ///
    /// The payment lands on the sale's ledger and a collection transaction
    /// linked back to it is stored, in one atomic store operation. A failed
    /// call records nothing, so retrying it never double-counts the payment.
    pub async fn collect(
        &self,
        sale: &Transaction,
        amount: Money,
        method: PaymentMethod,
        print_receipt: bool,
    ) -> SettleResult<SettleOutcome> {
        let _guard = FlightGuard::acquire(&self.in_flight)?;

        if sale.kind != TransactionKind::Sale {
            return Err(SettleError::NotASale);
        }
        validate_payment_amount(&amount).map_err(CoreError::from)?;

        let payment = PaymentRecord::new(amount, method);
        let collection = Transaction::new_collection(sale, payment.clone());
        let recorded = self.store.record_collection(&collection, &payment).await?;

        info!(
            collection_id = %recorded.collection.id,
            sale_id = %recorded.sale.id,
            amount = %recorded.collection.total,
            remaining_debt = %recorded.sale.outstanding_debt(),
            "payment collected"
        );

        let print_failure = self
            .print_if_requested(&recorded.collection, print_receipt)
            .await;

        Ok(SettleOutcome {
            transaction: recorded.collection,
            print_failure,
        })
    }

    async fn resolve_customer(&self, choice: &CustomerChoice) -> SettleResult<Customer> {
        match choice {
            CustomerChoice::Existing(customer) => Ok(customer.clone()),
            CustomerChoice::New { name } => {
                let name = validate_customer_name(name).map_err(|err| match err {
                    ValidationError::Required { .. } => SettleError::NoCustomer,
                    other => SettleError::Core(CoreError::from(other)),
                })?;
                let customer = Customer::walk_in(&name);
                self.customers.append(&customer).await?;
                debug!(customer_id = %customer.id, "registered walk-in customer");
                Ok(customer)
            }
        }
    }

    async fn print_if_requested(
        &self,
        transaction: &Transaction,
        requested: bool,
    ) -> Option<PrintError> {
        if !requested {
            return None;
        }
        match self.printer.print(transaction).await {
            Ok(()) => None,
            Err(err) => {
                warn!(transaction_id = %transaction.id, error = %err, "receipt print failed");
                Some(err)
            }
        }
    }
}

/// Builds the payment record a fresh sale starts with, if any.
///
/// Credit sales start with the down payment (tagged with the sale's own
/// method); other methods are paid in full immediately. A zero amount
/// produces no record at all.
fn initial_payment(
    method: PaymentMethod,
    total: Money,
    down_payment: &Option<String>,
) -> Option<PaymentRecord> {
    let amount = match method {
        PaymentMethod::Credit => down_payment
            .as_deref()
            .and_then(|raw| validate_operator_price(raw).ok())
            .unwrap_or_else(Money::zero)
            .clamp_non_negative(),
        PaymentMethod::Cash | PaymentMethod::MobileWallet => total,
    };

    if amount.is_positive() {
        Some(PaymentRecord::new(amount, method))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_initial_payment_full_for_cash() {
        let payment =
            initial_payment(PaymentMethod::Cash, Money::new(dec!(42.5)), &None).unwrap();
        assert_eq!(payment.amount, Money::new(dec!(42.5)));
        assert_eq!(payment.method, PaymentMethod::Cash);
    }

    #[test]
    fn test_initial_payment_credit_down_payment() {
        let payment = initial_payment(
            PaymentMethod::Credit,
            Money::new(dec!(100)),
            &Some("30".to_string()),
        )
        .unwrap();
        assert_eq!(payment.amount, Money::new(dec!(30)));
        assert_eq!(payment.method, PaymentMethod::Credit);
    }

    #[test]
    fn test_initial_payment_credit_garbage_degrades_to_none() {
        assert!(initial_payment(
            PaymentMethod::Credit,
            Money::new(dec!(100)),
            &Some("abc".to_string()),
        )
        .is_none());
        assert!(initial_payment(
            PaymentMethod::Credit,
            Money::new(dec!(100)),
            &Some("-5".to_string()),
        )
        .is_none());
        assert!(initial_payment(PaymentMethod::Credit, Money::new(dec!(100)), &None).is_none());
    }

    #[test]
    fn test_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = FlightGuard::acquire(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
            assert!(matches!(
                FlightGuard::acquire(&flag),
                Err(SettleError::AlreadyInFlight)
            ));
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(FlightGuard::acquire(&flag).is_ok());
    }
}

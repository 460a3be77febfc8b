//! Live register session: the shared cart plus the coordinator that
//! settles it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use marlin_core::Cart;

use crate::error::SettleResult;
use crate::settle::{SettleOutcome, SettleRequest, SettlementCoordinator};

/// One register's in-progress sale.
///
/// The cart lives behind an async mutex so UI tasks and the settlement path
/// can share it. All cart access goes through [`with_cart`] /
/// [`with_cart_mut`]; the lock is never held across an await on storage.
///
/// [`with_cart`]: SaleSession::with_cart
/// [`with_cart_mut`]: SaleSession::with_cart_mut
pub struct SaleSession {
    cart: Arc<Mutex<Cart>>,
    coordinator: Arc<SettlementCoordinator>,
}

impl SaleSession {
    pub fn new(coordinator: Arc<SettlementCoordinator>) -> Self {
        SaleSession {
            cart: Arc::new(Mutex::new(Cart::new())),
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &SettlementCoordinator {
        &self.coordinator
    }

    /// Runs `f` with shared access to the cart.
    pub async fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Runs `f` with exclusive access to the cart.
    pub async fn with_cart_mut<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut cart = self.cart.lock().await;
        f(&mut cart)
    }

    /// Settles the session's cart.
    ///
    /// The coordinator works on a clone taken under the lock, so the live
    /// cart is only cleared after the transaction is durably stored. A
    /// failed settlement leaves the cart exactly as it was.
    pub async fn settle(&self, request: SettleRequest) -> SettleResult<SettleOutcome> {
        let snapshot = self.cart.lock().await.clone();

        let outcome = self.coordinator.settle(&snapshot, request).await?;

        let mut cart = self.cart.lock().await;
        cart.clear();
        debug!(transaction_id = %outcome.transaction.id, "cart cleared after settlement");

        Ok(outcome)
    }
}

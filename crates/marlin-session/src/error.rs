//! Settlement error taxonomy.

use marlin_core::CoreError;

use crate::ports::StoreError;

pub type SettleResult<T> = Result<T, SettleError>;

#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    /// Another settlement on this coordinator has not finished yet. The
    /// caller's cart is untouched; retry once the first attempt resolves.
    #[error("a settlement is already in progress")]
    AlreadyInFlight,

    #[error("cannot settle an empty cart")]
    EmptyCart,

    /// No usable customer: the walk-in name was blank.
    #[error("a customer is required to settle")]
    NoCustomer,

    /// Debt collection was attempted against a non-sale transaction.
    #[error("payments can only be collected against a sale")]
    NotASale,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_passes_through_verbatim() {
        let err = SettleError::from(StoreError::Rejected("UNIQUE constraint failed".into()));
        assert_eq!(err.to_string(), "store rejected the request: UNIQUE constraint failed");
    }
}

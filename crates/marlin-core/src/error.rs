//! # Error Types
//!
//! Domain-specific error types for marlin-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  marlin-core errors (this file)                                     │
//! │  ├── CoreError        - Pricing/cart rule violations                │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  marlin-session errors (separate crate)                             │
//! │  ├── SettleError      - Settlement failures (wraps CoreError)       │
//! │  └── StoreError       - Transaction-store failures                  │
//! │                                                                     │
//! │  marlin-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → SettleError → caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent pricing or cart rule violations. They are detected
/// synchronously, before any store interaction, and never leave partial state
/// behind.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line exists at the given position.
    ///
    /// Cart rows are addressed by position, not catalog item id, because two
    /// configurations of the same catalog item are distinct rows.
    #[error("no cart line at position {index}")]
    LineNotFound { index: usize },

    /// Cart has exceeded the maximum allowed number of lines.
    #[error("cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A selected service is not offered by the catalog item.
    #[error("service {service} is not offered by item {item}")]
    ServiceNotOffered { item: String, service: String },

    /// Services cannot be combined with this line.
    ///
    /// Area-priced and ad-hoc lines have no catalog-defined service
    /// semantics, so selecting services for them is rejected rather than
    /// silently ignored.
    #[error("services are not available for line '{line}'")]
    ServicesNotSupported { line: String },

    /// Dimensions were supplied for (or requested on) a non-area line.
    #[error("line at position {index} is not area-priced")]
    NotAreaPriced { index: usize },

    /// Service toggling was requested on a line that has no service catalog.
    #[error("line at position {index} does not take services")]
    NotServicePriced { index: usize },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when operator-supplied input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value could not be parsed as a number.
    ///
    /// Operator-entered prices are free text; an unparseable price is a
    /// validation failure, never a silent zero.
    #[error("{field} '{value}' is not a number")]
    NotANumber { field: String, value: String },

    /// A monetary amount is negative where it must not be.
    #[error("{field} must not be negative")]
    NegativeAmount { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ServiceNotOffered {
            item: "Banner 440g".to_string(),
            service: "svc-9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "service svc-9 is not offered by item Banner 440g"
        );

        let err = CoreError::LineNotFound { index: 3 };
        assert_eq!(err.to_string(), "no cart line at position 3");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::NotANumber {
            field: "price".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price 'abc' is not a number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "width".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

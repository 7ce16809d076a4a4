//! Commerce error types.

use shopkit_data::FetchError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

/// Errors returned by checkout.
///
/// The cart is never modified when checkout fails.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The cart has no lines to order.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Another checkout for this session has not finished yet.
    #[error("A checkout is already in progress")]
    InProgress,

    /// The cart total could not be computed.
    #[error(transparent)]
    Pricing(#[from] CommerceError),

    /// The order backend rejected the order or could not be reached.
    #[error("Order backend error: {0}")]
    Backend(#[from] FetchError),
}

impl CheckoutError {
    /// Check if retrying the same checkout later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::InProgress => true,
            CheckoutError::Backend(FetchError::HttpError { status, .. }) => *status >= 500,
            CheckoutError::Backend(FetchError::Timeout | FetchError::RequestError(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_retryable() {
        assert!(CheckoutError::InProgress.is_retryable());
        assert!(CheckoutError::Backend(FetchError::Timeout).is_retryable());
        assert!(CheckoutError::Backend(FetchError::HttpError {
            status: 503,
            message: "down".to_string()
        })
        .is_retryable());
        assert!(!CheckoutError::Backend(FetchError::HttpError {
            status: 400,
            message: "bad".to_string()
        })
        .is_retryable());
        assert!(!CheckoutError::EmptyCart.is_retryable());
    }
}

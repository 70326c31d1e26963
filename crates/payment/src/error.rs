//! Payment error types.

use common::TokenId;
use container::ContainerError;
use thiserror::Error;

/// Errors raised by the gateway collaborator while processing a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The processor refused the payment.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The request was missing something the processor needs.
    #[error("Invalid gateway request: {0}")]
    InvalidRequest(String),

    /// The processor could not be reached or failed internally.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while creating a payment or computing its response.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The creation request was malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested starting state is not a known state.
    #[error("Unknown payment state: {0}")]
    UnknownState(String),

    /// The working data failed validation.
    #[error("Invalid payment data: '{field}' {reason}")]
    InvalidData { field: &'static str, reason: String },

    /// A saved payment method referenced a token that isn't stored.
    #[error("Saved payment token not found: {0}")]
    TokenNotFound(TokenId),

    /// States kept handing the payment on without producing a response.
    #[error("Transition limit of {0} exceeded while computing a response")]
    TransitionLimitExceeded(usize),

    /// A state or collaborator could not be resolved.
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// The gateway failed; the original error is kept as-is.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;

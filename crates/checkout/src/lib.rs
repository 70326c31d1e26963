//! Runs one payment attempt through the payment core.
//!
//! The request is a JSON object with a `state` naming the starting state and
//! the working data for the attempt. The payer's payment method may be given
//! as:
//! - `"payment_method": "pm_..."` for a newly entered method
//! - `"saved_token": 42` for a saved one
//! - `"payment_method": {"type": ..., "id": ...}` in either serialized form

pub mod config;

use std::sync::Arc;

use common::TokenId;
use payment::data::PAYMENT_METHOD_KEY;
use payment::{
    InMemoryGateway, InMemoryTokenStore, PaymentData, PaymentError, PaymentMethodData,
    PaymentMethodSelection, PaymentResponse, PaymentsContainer, select_payment_method,
};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

/// Field of a request naming a saved token by storage ID.
pub const SAVED_TOKEN_KEY: &str = "saved_token";

/// Request used when none is given on the command line.
pub const DEFAULT_REQUEST: &str = r#"{"state":"InitialState","amount":1000,"currency":"usd"}"#;

/// Errors surfaced by the checkout binary.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request was not valid JSON.
    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),

    /// The payment core failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Builds the payments container from configuration, using the in-memory
/// collaborators.
pub fn create_payments(config: &Config) -> (PaymentsContainer, InMemoryGateway, InMemoryTokenStore) {
    let gateway = InMemoryGateway::new();
    gateway.set_decline(config.gateway_decline);

    let tokens = InMemoryTokenStore::new();
    if let Some(token) = &config.saved_token {
        tokens.insert(token.clone());
    }

    let payments = PaymentsContainer::builder(Arc::new(gateway.clone()), Arc::new(tokens.clone()))
        .transition_limit(config.transition_limit)
        .build();

    (payments, gateway, tokens)
}

/// Takes the payer's payment-method choice out of the request, if any.
pub fn take_selection(data: &mut PaymentData) -> Result<Option<PaymentMethodSelection>, CheckoutError> {
    if let Some(value) = data.remove(SAVED_TOKEN_KEY) {
        let id: u64 = serde_json::from_value(value)?;
        return Ok(Some(PaymentMethodSelection::Saved(TokenId::new(id))));
    }

    match data.remove(PAYMENT_METHOD_KEY) {
        None => Ok(None),
        Some(Value::String(id)) => Ok(Some(PaymentMethodSelection::New(id))),
        Some(other) => {
            let method: PaymentMethodData = serde_json::from_value(other)?;
            Ok(Some(method.into()))
        }
    }
}

/// Parses `request`, resolves its payment method and runs the payment.
#[tracing::instrument(skip_all)]
pub fn run(payments: &PaymentsContainer, request: &str) -> Result<PaymentResponse, CheckoutError> {
    let value: Value = serde_json::from_str(request)?;
    let mut data = PaymentData::try_from(value)?;

    if let Some(selection) = take_selection(&mut data)? {
        let tokens = payments.tokens()?;
        let method = select_payment_method(selection, tokens.as_ref())?;
        tracing::debug!(payment_method = method.id(), "payment method selected");
        data.set_payment_method(method.as_ref())?;
    }

    let mut payment = payments.service().create_payment(data)?;
    let response = payment.get_response()?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use payment::{PaymentToken, StateKind};
    use serde_json::json;

    fn data(value: Value) -> PaymentData {
        PaymentData::try_from(value).unwrap()
    }

    #[test]
    fn test_take_selection_new() {
        let mut data = data(json!({ "payment_method": "pm_1", "amount": 1 }));
        let selection = take_selection(&mut data).unwrap();

        assert_eq!(selection, Some(PaymentMethodSelection::New("pm_1".into())));
        assert!(!data.contains_key("payment_method"));
    }

    #[test]
    fn test_take_selection_saved() {
        let mut data = data(json!({ "saved_token": 42 }));
        let selection = take_selection(&mut data).unwrap();

        assert_eq!(selection, Some(PaymentMethodSelection::Saved(TokenId::new(42))));
        assert!(data.is_empty());
    }

    #[test]
    fn test_take_selection_serialized_form() {
        let mut data = data(json!({ "payment_method": { "type": "saved", "id": 7 } }));
        let selection = take_selection(&mut data).unwrap();

        assert_eq!(selection, Some(PaymentMethodSelection::Saved(TokenId::new(7))));
    }

    #[test]
    fn test_take_selection_none() {
        let mut data = data(json!({ "amount": 1 }));
        assert_eq!(take_selection(&mut data).unwrap(), None);
    }

    #[test]
    fn test_run_default_request() {
        let (payments, gateway, _) = create_payments(&Config::default());

        let response = run(&payments, DEFAULT_REQUEST).unwrap();
        assert_eq!(response.state, StateKind::Prepared);
        assert_eq!(gateway.request_count(), 1);
    }

    #[test]
    fn test_run_with_saved_token() {
        let config = Config {
            saved_token: Some(PaymentToken::new(42u64, "pm_card_visa")),
            ..Config::default()
        };
        let (payments, gateway, _) = create_payments(&config);

        let response = run(
            &payments,
            r#"{"state":"InitialState","amount":500,"saved_token":42}"#,
        )
        .unwrap();

        assert_eq!(response.outcome.payment_method_id.as_deref(), Some("pm_card_visa"));
        let sent = gateway.last_request().unwrap();
        assert_eq!(sent.get("payment_method"), Some(&json!({ "type": "saved", "id": 42 })));
    }

    #[test]
    fn test_run_declined() {
        let config = Config {
            gateway_decline: true,
            ..Config::default()
        };
        let (payments, _, _) = create_payments(&config);

        let err = run(&payments, DEFAULT_REQUEST).unwrap_err();
        assert!(matches!(err, CheckoutError::Payment(PaymentError::Gateway(_))));
    }

    #[test]
    fn test_run_rejects_malformed_json() {
        let (payments, _, _) = create_payments(&Config::default());
        let err = run(&payments, "{not json").unwrap_err();
        assert!(matches!(err, CheckoutError::Request(_)));
    }

    #[test]
    fn test_run_rejects_non_object() {
        let (payments, _, _) = create_payments(&Config::default());
        let err = run(&payments, "[1]").unwrap_err();
        assert!(matches!(err, CheckoutError::Payment(PaymentError::InvalidArgument(_))));
    }
}

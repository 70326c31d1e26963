use crate::data::PAYMENT_METHOD_KEY;
use crate::error::{PaymentError, Result};
use crate::payment::Payment;
use crate::payment_method::PaymentMethodData;
use crate::state::{PaymentResponse, State, StateKind};

/// Entry state. Validates the working data and moves the payment to
/// [`StateKind::Prepared`], which then produces the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialState;

impl InitialState {
    pub fn new() -> Self {
        Self
    }

    fn validate(payment: &Payment) -> Result<()> {
        let amount = payment
            .data()
            .get("amount")
            .ok_or_else(|| PaymentError::InvalidData {
                field: "amount",
                reason: "is required".to_string(),
            })?;

        let amount = amount.as_i64().ok_or_else(|| PaymentError::InvalidData {
            field: "amount",
            reason: format!("must be an integer amount in minor units, got {amount}"),
        })?;

        if amount <= 0 {
            return Err(PaymentError::InvalidData {
                field: "amount",
                reason: format!("must be positive, got {amount}"),
            });
        }

        if let Some(method) = payment.data().get(PAYMENT_METHOD_KEY) {
            serde_json::from_value::<PaymentMethodData>(method.clone()).map_err(|e| {
                PaymentError::InvalidData {
                    field: PAYMENT_METHOD_KEY,
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(())
    }
}

impl State for InitialState {
    fn kind(&self) -> StateKind {
        StateKind::Initial
    }

    fn get_response(&self, payment: &mut Payment) -> Result<PaymentResponse> {
        Self::validate(payment)?;
        payment.advance(StateKind::Prepared)?;
        payment.get_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PaymentData;
    use crate::state::StateResolver;
    use container::Container;
    use serde_json::json;
    use std::sync::Arc;

    fn payment(data: serde_json::Value) -> Payment {
        let mut payment = Payment::new(
            Arc::new(InitialState::new()),
            StateResolver::new(Arc::new(Container::new())),
        );
        payment.set_data(PaymentData::try_from(data).unwrap());
        payment
    }

    fn invalid_field(data: serde_json::Value) -> &'static str {
        match payment(data).get_response() {
            Err(PaymentError::InvalidData { field, .. }) => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_amount_is_required() {
        assert_eq!(invalid_field(json!({})), "amount");
    }

    #[test]
    fn test_amount_must_be_an_integer() {
        assert_eq!(invalid_field(json!({ "amount": "10.00" })), "amount");
        assert_eq!(invalid_field(json!({ "amount": 10.5 })), "amount");
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert_eq!(invalid_field(json!({ "amount": 0 })), "amount");
        assert_eq!(invalid_field(json!({ "amount": -5 })), "amount");
    }

    #[test]
    fn test_payment_method_must_be_tagged() {
        assert_eq!(
            invalid_field(json!({ "amount": 100, "payment_method": { "id": "pm_1" } })),
            "payment_method"
        );
    }

    #[test]
    fn test_invalid_data_stays_in_initial_state() {
        let mut payment = payment(json!({ "amount": 0 }));
        assert!(payment.get_response().is_err());
        assert_eq!(payment.history(), &[StateKind::Initial]);
    }

    #[test]
    fn test_valid_data_needs_a_prepared_state() {
        let mut payment = payment(json!({
            "amount": 100,
            "payment_method": { "type": "new", "id": "pm_1" }
        }));

        let err = payment.get_response().unwrap_err();
        assert!(matches!(err, PaymentError::Container(_)));
    }
}

use std::sync::Arc;

use crate::error::Result;
use crate::payment::Payment;
use crate::services::gateway::Gateway;
use crate::state::{PaymentResponse, State, StateKind};

/// Ready-to-process state. Hands the working data to the gateway and
/// reports what it returned.
pub struct PreparedState {
    gateway: Arc<dyn Gateway>,
}

impl PreparedState {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

impl State for PreparedState {
    fn kind(&self) -> StateKind {
        StateKind::Prepared
    }

    fn get_response(&self, payment: &mut Payment) -> Result<PaymentResponse> {
        match self.gateway.process(payment.data()) {
            Ok(outcome) => {
                metrics::counter!("gateway_requests_total", "outcome" => "accepted").increment(1);
                tracing::info!(
                    payment_id = %payment.id(),
                    transaction_id = %outcome.transaction_id,
                    "gateway accepted payment"
                );
                Ok(PaymentResponse {
                    payment_id: payment.id(),
                    state: self.kind(),
                    outcome,
                })
            }
            Err(e) => {
                metrics::counter!("gateway_requests_total", "outcome" => "failed").increment(1);
                tracing::warn!(payment_id = %payment.id(), error = %e, "gateway rejected payment");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PaymentData;
    use crate::error::{GatewayError, PaymentError};
    use crate::services::gateway::InMemoryGateway;
    use crate::state::StateResolver;
    use container::Container;
    use serde_json::json;

    fn payment(gateway: &InMemoryGateway) -> Payment {
        let state = PreparedState::new(Arc::new(gateway.clone()));
        let mut payment = Payment::new(
            Arc::new(state),
            StateResolver::new(Arc::new(Container::new())),
        );
        payment.set_data(PaymentData::try_from(json!({ "amount": 2500 })).unwrap());
        payment
    }

    #[test]
    fn test_response_carries_gateway_outcome() {
        let gateway = InMemoryGateway::new();
        let mut payment = payment(&gateway);

        let response = payment.get_response().unwrap();
        assert_eq!(response.state, StateKind::Prepared);
        assert_eq!(response.payment_id, payment.id());
        assert_eq!(response.outcome.transaction_id, "PAY-0001");
        assert_eq!(gateway.last_request(), Some(payment.data().clone()));
    }

    #[test]
    fn test_gateway_error_propagates_unchanged() {
        let gateway = InMemoryGateway::new();
        gateway.set_decline(true);
        let mut payment = payment(&gateway);

        let err = payment.get_response().unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Gateway(GatewayError::Declined(ref reason)) if reason == "Payment declined"
        ));
        assert_eq!(payment.state_kind(), StateKind::Prepared);
    }
}

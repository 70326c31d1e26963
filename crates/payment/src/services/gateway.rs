//! Gateway collaborator trait and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use common::Money;
use serde::{Deserialize, Serialize};

use crate::data::{PAYMENT_METHOD_ID_KEY, PaymentData};
use crate::error::GatewayError;

/// Processor-side status of a processed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Succeeded,
    /// The payer must complete an extra step (e.g. a card challenge).
    RequiresAction,
}

/// Result of a payment the gateway accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOutcome {
    /// The transaction ID assigned by the processor.
    pub transaction_id: String,
    pub status: GatewayStatus,
    pub amount: Money,
    /// The processor-facing payment method identifier, if one was given.
    pub payment_method_id: Option<String>,
    pub processed_at: DateTime<Utc>,
}

/// The underlying gateway that actually authorizes and captures payments.
///
/// Implementations own their own timeout and retry behavior.
pub trait Gateway: Send + Sync {
    fn process(&self, data: &PaymentData) -> Result<GatewayOutcome, GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    requests: Vec<PaymentData>,
    next_id: u32,
    decline: bool,
    requires_action: bool,
}

/// In-memory gateway for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to decline every request.
    pub fn set_decline(&self, decline: bool) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).decline = decline;
    }

    /// Configures accepted payments to report [`GatewayStatus::RequiresAction`].
    pub fn set_requires_action(&self, requires_action: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .requires_action = requires_action;
    }

    /// Returns the number of requests received, accepted or not.
    pub fn request_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .len()
    }

    /// Returns the data of the most recent request.
    pub fn last_request(&self) -> Option<PaymentData> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .last()
            .cloned()
    }
}

impl Gateway for InMemoryGateway {
    fn process(&self, data: &PaymentData) -> Result<GatewayOutcome, GatewayError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(data.clone());

        if state.decline {
            return Err(GatewayError::Declined("Payment declined".to_string()));
        }

        let amount = data
            .amount()
            .ok_or_else(|| GatewayError::InvalidRequest("amount is required".to_string()))?;

        state.next_id += 1;
        let status = if state.requires_action {
            GatewayStatus::RequiresAction
        } else {
            GatewayStatus::Succeeded
        };

        Ok(GatewayOutcome {
            transaction_id: format!("PAY-{:04}", state.next_id),
            status,
            amount,
            payment_method_id: data
                .get(PAYMENT_METHOD_ID_KEY)
                .and_then(|value| value.as_str())
                .map(str::to_string),
            processed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> PaymentData {
        PaymentData::try_from(value).unwrap()
    }

    #[test]
    fn test_process_success() {
        let gateway = InMemoryGateway::new();
        let outcome = gateway
            .process(&data(json!({ "amount": 5000, "payment_method_id": "pm_1" })))
            .unwrap();

        assert!(outcome.transaction_id.starts_with("PAY-"));
        assert_eq!(outcome.status, GatewayStatus::Succeeded);
        assert_eq!(outcome.amount, Money::from_minor(5000));
        assert_eq!(outcome.payment_method_id.as_deref(), Some("pm_1"));
        assert_eq!(gateway.request_count(), 1);
    }

    #[test]
    fn test_decline() {
        let gateway = InMemoryGateway::new();
        gateway.set_decline(true);

        let err = gateway.process(&data(json!({ "amount": 5000 }))).unwrap_err();
        assert_eq!(err, GatewayError::Declined("Payment declined".to_string()));
        assert_eq!(gateway.request_count(), 1);
    }

    #[test]
    fn test_missing_amount() {
        let gateway = InMemoryGateway::new();
        let err = gateway.process(&PaymentData::new()).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[test]
    fn test_requires_action() {
        let gateway = InMemoryGateway::new();
        gateway.set_requires_action(true);

        let outcome = gateway.process(&data(json!({ "amount": 100 }))).unwrap();
        assert_eq!(outcome.status, GatewayStatus::RequiresAction);
    }

    #[test]
    fn test_sequential_transaction_ids() {
        let gateway = InMemoryGateway::new();
        let request = data(json!({ "amount": 100 }));

        let r1 = gateway.process(&request).unwrap();
        let r2 = gateway.process(&request).unwrap();

        assert_eq!(r1.transaction_id, "PAY-0001");
        assert_eq!(r2.transaction_id, "PAY-0002");
        assert_eq!(gateway.last_request(), Some(request));
    }
}

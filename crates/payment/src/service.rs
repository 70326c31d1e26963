//! Payment service creating payments wired to their starting state.

use std::sync::Arc;

use container::Container;
use serde_json::Value;

use crate::data::PaymentData;
use crate::error::{PaymentError, Result};
use crate::payment::{DEFAULT_TRANSITION_LIMIT, Payment};
use crate::state::{StateKind, StateResolver};

/// Field of a creation request naming the starting state.
pub const STATE_KEY: &str = "state";

/// Creates payments.
///
/// Holds nothing per payment; every call builds a new [`Payment`] whose
/// starting state is resolved from the container.
#[derive(Debug, Clone)]
pub struct Service {
    states: StateResolver,
    transition_limit: usize,
}

impl Service {
    /// Creates a new service resolving states from the given container.
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            states: StateResolver::new(container),
            transition_limit: DEFAULT_TRANSITION_LIMIT,
        }
    }

    /// Sets the transition limit applied to every payment this service creates.
    pub fn with_transition_limit(mut self, limit: usize) -> Self {
        self.transition_limit = limit;
        self
    }

    /// Creates a payment from a request whose `state` field names the
    /// starting state.
    ///
    /// The `state` field is removed; the remaining fields become the
    /// payment's working data.
    #[tracing::instrument(skip(self, data))]
    pub fn create_payment(&self, data: impl Into<PaymentData>) -> Result<Payment> {
        let mut data = data.into();

        let kind = match data.remove(STATE_KEY) {
            Some(Value::String(name)) => name.parse::<StateKind>()?,
            Some(other) => {
                return Err(PaymentError::InvalidArgument(format!(
                    "'{STATE_KEY}' must be a state name, got {other}"
                )));
            }
            None => {
                return Err(PaymentError::InvalidArgument(format!(
                    "'{STATE_KEY}' is required"
                )));
            }
        };

        self.create_payment_in(kind, data)
    }

    /// Creates a payment starting in `kind` with `data` as its working data.
    #[tracing::instrument(skip(self, data))]
    pub fn create_payment_in(&self, kind: StateKind, data: impl Into<PaymentData>) -> Result<Payment> {
        let state = self.states.resolve(kind)?;

        let mut payment =
            Payment::new(state, self.states.clone()).with_transition_limit(self.transition_limit);
        payment.set_data(data);

        metrics::counter!("payments_created_total").increment(1);
        tracing::info!(payment_id = %payment.id(), state = %kind, "payment created");

        Ok(payment)
    }
}

//! The payment aggregate.

use std::sync::Arc;

use common::PaymentId;

use crate::data::PaymentData;
use crate::error::{PaymentError, Result};
use crate::state::{PaymentResponse, SharedState, State, StateKind, StateResolver};

/// Default bound on how many states may chain into each other while one
/// response is computed.
pub const DEFAULT_TRANSITION_LIMIT: usize = 16;

/// One payment attempt: its current state and its working data.
///
/// A payment always has a state; it can only be replaced through
/// [`Payment::transition_to`]. Whether a transition is legal is up to the
/// states themselves.
pub struct Payment {
    id: PaymentId,
    state: SharedState,
    data: PaymentData,
    history: Vec<StateKind>,
    states: StateResolver,
    transition_limit: usize,
    depth: usize,
}

impl Payment {
    /// Creates a payment starting in `state`.
    pub fn new(state: SharedState, states: StateResolver) -> Self {
        let id = PaymentId::new();
        tracing::debug!(payment_id = %id, state = %state.kind(), "payment attached to initial state");

        Self {
            id,
            history: vec![state.kind()],
            state,
            data: PaymentData::new(),
            states,
            transition_limit: DEFAULT_TRANSITION_LIMIT,
            depth: 0,
        }
    }

    /// Sets how deep states may delegate to successors within one
    /// [`Payment::get_response`] call.
    pub fn with_transition_limit(mut self, limit: usize) -> Self {
        self.transition_limit = limit;
        self
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn current_state(&self) -> &SharedState {
        &self.state
    }

    pub fn state_kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Kinds of every state the payment has been in, oldest first.
    pub fn history(&self) -> &[StateKind] {
        &self.history
    }

    pub fn data(&self) -> &PaymentData {
        &self.data
    }

    /// Replaces the working data wholesale. Fields of the previous data are
    /// not kept.
    pub fn set_data(&mut self, data: impl Into<PaymentData>) {
        self.data = data.into();
    }

    /// Makes `state` the current state.
    pub fn transition_to(&mut self, state: SharedState) {
        let from = self.state.kind();
        let to = state.kind();

        self.state = state;
        self.history.push(to);

        metrics::counter!(
            "payment_state_transitions_total",
            "from" => from.as_str(),
            "to" => to.as_str()
        )
        .increment(1);
        tracing::info!(payment_id = %self.id, %from, %to, "payment transitioned");
    }

    /// Resolves the state registered for `kind` and transitions to it.
    pub fn advance(&mut self, kind: StateKind) -> Result<()> {
        let state = self.states.resolve(kind)?;
        self.transition_to(state);
        Ok(())
    }

    /// Asks the current state for the payment's response.
    ///
    /// Errors raised by the state, including gateway failures, are returned
    /// unchanged.
    pub fn get_response(&mut self) -> Result<PaymentResponse> {
        if self.depth >= self.transition_limit {
            return Err(PaymentError::TransitionLimitExceeded(self.transition_limit));
        }

        let state = Arc::clone(&self.state);
        self.depth += 1;
        let response = state.get_response(self);
        self.depth -= 1;
        response
    }
}

impl std::fmt::Debug for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payment")
            .field("id", &self.id)
            .field("state", &self.state.kind())
            .field("data", &self.data)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

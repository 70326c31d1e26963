//! Payment state contract.

use std::str::FromStr;
use std::sync::Arc;

use common::PaymentId;
use container::Container;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};
use crate::payment::Payment;
use crate::services::gateway::GatewayOutcome;

/// The known payment states.
///
/// Each kind's name doubles as the container identifier its state is
/// registered under, so `"InitialState"` in a creation request resolves the
/// state registered as `StateKind::Initial.as_str()`.
///
/// ```text
/// Initial ──► Prepared
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Entry state: validates the working data, then prepares the payment.
    #[serde(rename = "InitialState")]
    Initial,

    /// Hands the payment to the gateway and reports its outcome.
    #[serde(rename = "PreparedState")]
    Prepared,
}

impl StateKind {
    /// Every known state kind.
    pub const ALL: [StateKind; 2] = [StateKind::Initial, StateKind::Prepared];

    /// Returns the state name, which is also its container identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Initial => "InitialState",
            StateKind::Prepared => "PreparedState",
        }
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StateKind {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        StateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PaymentError::UnknownState(s.to_string()))
    }
}

/// What a state reports back for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    /// The state that produced the response.
    pub state: StateKind,
    pub outcome: GatewayOutcome,
}

/// One stage of a payment's lifecycle.
///
/// The owning payment is passed to every call, so a state reads and changes
/// it through that context and never holds on to it. A state may move the
/// payment on with [`Payment::transition_to`] or [`Payment::advance`] and
/// then delegate to [`Payment::get_response`].
pub trait State: Send + Sync {
    fn kind(&self) -> StateKind;

    fn get_response(&self, payment: &mut Payment) -> Result<PaymentResponse>;
}

/// How states are stored in the container and held by payments.
pub type SharedState = Arc<dyn State>;

/// Resolves states from the container by kind.
#[derive(Clone)]
pub struct StateResolver {
    container: Arc<Container>,
}

impl StateResolver {
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// Resolves a new instance of the state registered for `kind`.
    pub fn resolve(&self, kind: StateKind) -> Result<SharedState> {
        let state = self.container.get::<SharedState>(kind.as_str())?;
        Ok((*state).clone())
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }
}

impl std::fmt::Debug for StateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateResolver").finish_non_exhaustive()
    }
}

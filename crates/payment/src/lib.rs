//! Payment state machine.
//!
//! A [`Payment`] owns its current [`State`] and its working data, and asks
//! that state for its response. States are resolved from a [`Container`]
//! (see [`PaymentsContainer`]) so their collaborators are injected:
//!
//! 1. [`Service::create_payment`] builds a payment in the requested state
//! 2. [`InitialState`] validates the data and advances to [`PreparedState`]
//! 3. [`PreparedState`] hands the data to the [`Gateway`] and reports the outcome
//!
//! [`Container`]: container::Container

pub mod bootstrap;
pub mod data;
pub mod error;
pub mod payment;
pub mod payment_method;
pub mod service;
pub mod services;
pub mod state;
pub mod states;

pub use bootstrap::{PaymentsContainer, PaymentsContainerBuilder};
pub use data::PaymentData;
pub use error::{GatewayError, PaymentError, Result};
pub use payment::Payment;
pub use payment_method::{
    NewPaymentMethod, PaymentMethod, PaymentMethodData, PaymentMethodSelection,
    SavedPaymentMethod, select_payment_method,
};
pub use service::Service;
pub use services::{
    Gateway, GatewayOutcome, GatewayStatus, InMemoryGateway, InMemoryTokenStore, PaymentToken,
    TokenStore,
};
pub use state::{PaymentResponse, SharedState, State, StateKind, StateResolver};
pub use states::{InitialState, PreparedState};

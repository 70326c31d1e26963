//! Collaborator traits and in-memory implementations used by the states.

pub mod gateway;
pub mod tokens;

pub use gateway::{Gateway, GatewayOutcome, GatewayStatus, InMemoryGateway};
pub use tokens::{InMemoryTokenStore, PaymentToken, TokenStore};

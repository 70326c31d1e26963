//! Identifiers and value objects shared by the payment crates.

mod types;

pub use types::{Money, PaymentId, TokenId};

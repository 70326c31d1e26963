//! Saved payment token storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use common::TokenId;
use serde::{Deserialize, Serialize};

/// A previously stored payment method.
///
/// Carries two identifiers: `id` is the internal storage key used to look
/// the token up again, `token` is the external string the processor knows.
/// `customer` is the processor's customer the token is attached to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    pub id: TokenId,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl PaymentToken {
    pub fn new(id: impl Into<TokenId>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }
}

/// Storage of saved payment tokens.
pub trait TokenStore: Send + Sync {
    /// Looks up a token by its internal storage identifier.
    fn get(&self, id: TokenId) -> Option<PaymentToken>;
}

/// In-memory token store for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<TokenId, PaymentToken>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a token, replacing any token with the same storage identifier.
    pub fn insert(&self, token: PaymentToken) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.id, token);
    }

    pub fn len(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, id: TokenId) -> Option<PaymentToken> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

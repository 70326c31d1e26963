//! Payment method variants.
//!
//! Code handling "the payment method for this attempt" works with
//! `dyn PaymentMethod` only. The concrete variant is chosen once, in
//! [`select_payment_method`], where the payer's choice enters the system.

use common::TokenId;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};
use crate::services::tokens::{PaymentToken, TokenStore};

/// Serializable form of a payment method, tagged by variant.
///
/// ```text
/// {"type": "new",   "id": "pm_123"}
/// {"type": "saved", "id": 42}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentMethodData {
    New { id: String },
    Saved { id: TokenId },
}

/// The instrument the payer is paying with.
pub trait PaymentMethod: Send + Sync + std::fmt::Debug {
    /// The identifier the processor expects.
    fn id(&self) -> &str;

    /// Representation for persistence or transmission.
    fn data(&self) -> PaymentMethodData;
}

/// A payment method just entered by the payer, e.g. a freshly tokenized card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentMethod {
    id: String,
}

impl NewPaymentMethod {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl PaymentMethod for NewPaymentMethod {
    fn id(&self) -> &str {
        &self.id
    }

    fn data(&self) -> PaymentMethodData {
        PaymentMethodData::New {
            id: self.id.clone(),
        }
    }
}

/// A previously saved payment method.
///
/// `id()` is the external token string while `data()` carries the internal
/// storage identifier, which is what stays valid for a later lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPaymentMethod {
    token: PaymentToken,
}

impl SavedPaymentMethod {
    pub fn new(token: PaymentToken) -> Self {
        Self { token }
    }

    /// Loads the saved token with the given storage identifier.
    pub fn load(tokens: &dyn TokenStore, id: TokenId) -> Result<Self> {
        tokens
            .get(id)
            .map(Self::new)
            .ok_or(PaymentError::TokenNotFound(id))
    }

    pub fn token(&self) -> &PaymentToken {
        &self.token
    }
}

impl PaymentMethod for SavedPaymentMethod {
    fn id(&self) -> &str {
        &self.token.token
    }

    fn data(&self) -> PaymentMethodData {
        PaymentMethodData::Saved { id: self.token.id }
    }
}

/// What the payer picked at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodSelection {
    /// An instrument entered now, identified by the processor's reference.
    New(String),
    /// A saved token, identified by its storage ID.
    Saved(TokenId),
}

impl From<PaymentMethodData> for PaymentMethodSelection {
    fn from(data: PaymentMethodData) -> Self {
        match data {
            PaymentMethodData::New { id } => PaymentMethodSelection::New(id),
            PaymentMethodData::Saved { id } => PaymentMethodSelection::Saved(id),
        }
    }
}

/// Builds the payment method for a selection, loading saved tokens from `tokens`.
pub fn select_payment_method(
    selection: PaymentMethodSelection,
    tokens: &dyn TokenStore,
) -> Result<Box<dyn PaymentMethod>> {
    match selection {
        PaymentMethodSelection::New(id) => Ok(Box::new(NewPaymentMethod::new(id))),
        PaymentMethodSelection::Saved(id) => Ok(Box::new(SavedPaymentMethod::load(tokens, id)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tokens::InMemoryTokenStore;
    use serde_json::json;

    fn store() -> InMemoryTokenStore {
        let store = InMemoryTokenStore::new();
        store.insert(PaymentToken::new(42u64, "pm_saved_as_woo_token"));
        store
    }

    #[test]
    fn test_new_payment_method() {
        let method = NewPaymentMethod::new("pm_123");

        assert_eq!(method.id(), "pm_123");
        assert_eq!(
            serde_json::to_value(method.data()).unwrap(),
            json!({ "type": "new", "id": "pm_123" })
        );
    }

    #[test]
    fn test_saved_payment_method_ids_differ() {
        let method = SavedPaymentMethod::new(PaymentToken::new(42u64, "pm_saved_as_woo_token"));

        assert_eq!(method.id(), "pm_saved_as_woo_token");
        assert_eq!(
            serde_json::to_value(method.data()).unwrap(),
            json!({ "type": "saved", "id": 42 })
        );
    }

    #[test]
    fn test_data_is_stable() {
        let method = NewPaymentMethod::new("pm_123");
        assert_eq!(method.data(), method.data());
    }

    #[test]
    fn test_data_deserializes_to_the_right_variant() {
        let new: PaymentMethodData =
            serde_json::from_value(json!({ "type": "new", "id": "pm_1" })).unwrap();
        let saved: PaymentMethodData =
            serde_json::from_value(json!({ "type": "saved", "id": 7 })).unwrap();

        assert_eq!(new, PaymentMethodData::New { id: "pm_1".into() });
        assert_eq!(saved, PaymentMethodData::Saved { id: TokenId::new(7) });
    }

    #[test]
    fn test_untagged_data_is_rejected() {
        let result = serde_json::from_value::<PaymentMethodData>(json!({ "id": "pm_1" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_select_new() {
        let method =
            select_payment_method(PaymentMethodSelection::New("pm_9".into()), &store()).unwrap();
        assert_eq!(method.id(), "pm_9");
    }

    #[test]
    fn test_select_saved_loads_token() {
        let method =
            select_payment_method(PaymentMethodSelection::Saved(TokenId::new(42)), &store())
                .unwrap();

        assert_eq!(method.id(), "pm_saved_as_woo_token");
        assert_eq!(method.data(), PaymentMethodData::Saved { id: TokenId::new(42) });
    }

    #[test]
    fn test_select_saved_unknown_token() {
        let err = select_payment_method(PaymentMethodSelection::Saved(TokenId::new(1)), &store())
            .unwrap_err();
        assert!(matches!(err, PaymentError::TokenNotFound(id) if id == TokenId::new(1)));
    }

    #[test]
    fn test_selection_from_data() {
        let selection = PaymentMethodSelection::from(PaymentMethodData::Saved { id: TokenId::new(3) });
        assert_eq!(selection, PaymentMethodSelection::Saved(TokenId::new(3)));
    }
}

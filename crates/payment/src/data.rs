//! Working data of an in-progress payment attempt.

use common::Money;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PaymentError, Result};
use crate::payment_method::PaymentMethod;

/// Field holding the serialized payment method (`{"type": ..., "id": ...}`).
pub const PAYMENT_METHOD_KEY: &str = "payment_method";

/// Field holding the identifier the processor expects for the payment method.
pub const PAYMENT_METHOD_ID_KEY: &str = "payment_method_id";

/// Open-ended key/value map of working fields: amount, payment method,
/// order reference and whatever else a state needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentData(Map<String, Value>);

impl PaymentData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the `amount` field if it is an integer of minor units.
    pub fn amount(&self) -> Option<Money> {
        self.get("amount").and_then(Value::as_i64).map(Money::from_minor)
    }

    /// Records the chosen payment method under [`PAYMENT_METHOD_KEY`] and its
    /// processor-facing identifier under [`PAYMENT_METHOD_ID_KEY`].
    pub fn set_payment_method(&mut self, method: &dyn PaymentMethod) -> Result<()> {
        let data = serde_json::to_value(method.data())?;
        self.insert(PAYMENT_METHOD_KEY, data);
        self.insert(PAYMENT_METHOD_ID_KEY, method.id());
        Ok(())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for PaymentData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for PaymentData {
    type Error = PaymentError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PaymentError::InvalidArgument(format!(
                "payment data must be a JSON object, got {other}"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PaymentData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

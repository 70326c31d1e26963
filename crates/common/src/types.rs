use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a payment attempt.
///
/// Wraps a UUID so payment IDs can't be mixed up with other UUID-based
/// identifiers handled by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random payment ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a payment ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PaymentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Internal storage identifier of a saved payment token.
///
/// This is the durable key used to look a token up again, as opposed to the
/// external token string the processor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Amount in the currency's minor unit (e.g., 1000 = $10.00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new Money amount from minor units.
    pub fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major portion (whole number).
    pub fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor portion (remainder after the major units).
    pub fn minor_part(&self) -> i64 {
        (self.0.unsigned_abs() % 100) as i64
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "-{}.{:02}", self.major().unsigned_abs(), self.minor_part())
        } else {
            write!(f, "{}.{:02}", self.major(), self.minor_part())
        }
    }
}

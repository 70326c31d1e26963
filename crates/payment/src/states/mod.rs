//! Concrete payment states.

mod initial;
mod prepared;

pub use initial::InitialState;
pub use prepared::PreparedState;

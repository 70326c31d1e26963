//! Dependency-injection container for the payment core.
//!
//! Services are registered under string identifiers with a factory and an
//! ordered list of constructor arguments, each of which is itself an
//! identifier resolved recursively when the service is requested:
//!
//! ```
//! use container::Container;
//!
//! struct Clock;
//! struct Ledger { clock: std::sync::Arc<Clock> }
//!
//! let mut container = Container::new();
//! container.add_shared("clock", |_| Ok(Clock));
//! container
//!     .add("ledger", |args| Ok(Ledger { clock: args.get::<Clock>(0)? }))
//!     .add_argument("clock");
//!
//! let ledger = container.get::<Ledger>("ledger").unwrap();
//! let clock = container.get::<Clock>("clock").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&ledger.clock, &clock));
//! ```
//!
//! Identifiers the container doesn't know are forwarded to registered
//! [`Delegate`]s before resolution fails.

pub mod arguments;
pub mod container;
pub mod definition;
pub mod error;

pub use arguments::Arguments;
pub use container::{Container, Delegate};
pub use definition::{Definition, Instance};
pub use error::{ContainerError, Result};

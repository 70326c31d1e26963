//! Service definitions.

use std::any::Any;
use std::sync::Arc;

use crate::arguments::Arguments;
use crate::error::Result;

/// A resolved service instance, type-erased.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Factory = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

pub(crate) enum Concrete {
    Instance(Instance),
    Factory(Factory),
}

/// How a service identifier is turned into an instance.
///
/// Returned by the container's `add*` methods so constructor arguments and
/// sharing can be declared fluently during bootstrap.
pub struct Definition {
    id: String,
    pub(crate) concrete: Concrete,
    arguments: Vec<String>,
    shared: bool,
}

impl Definition {
    pub(crate) fn new(id: String, concrete: Concrete) -> Self {
        let shared = matches!(concrete, Concrete::Instance(_));
        Self {
            id,
            concrete,
            arguments: Vec::new(),
            shared,
        }
    }

    /// Declares the next constructor argument by identifier.
    ///
    /// Arguments are handed to the factory in declaration order.
    pub fn add_argument(&mut self, id: impl Into<String>) -> &mut Self {
        self.arguments.push(id.into());
        self
    }

    /// Marks the definition as shared (resolved once, then cached) or transient.
    ///
    /// Definitions built from a concrete instance are always shared.
    pub fn set_shared(&mut self, shared: bool) -> &mut Self {
        self.shared = shared || matches!(self.concrete, Concrete::Instance(_));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("id", &self.id)
            .field("arguments", &self.arguments)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

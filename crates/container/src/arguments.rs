//! Resolved constructor arguments handed to factories.

use std::any::Any;
use std::sync::Arc;

use crate::definition::Instance;
use crate::error::{ContainerError, Result};

/// The constructor arguments of one service, resolved in declaration order.
pub struct Arguments {
    service: String,
    values: Vec<(String, Instance)>,
}

impl Arguments {
    pub(crate) fn new(service: impl Into<String>, values: Vec<(String, Instance)>) -> Self {
        Self {
            service: service.into(),
            values,
        }
    }

    /// Returns the argument at `index`, downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let (id, value) = self
            .values
            .get(index)
            .ok_or_else(|| ContainerError::MissingArgument {
                id: self.service.clone(),
                index,
            })?;

        Arc::clone(value)
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                id: id.clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Returns the identifier of the service being constructed.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

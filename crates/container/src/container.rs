//! The service registry.

use std::any::Any;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::arguments::Arguments;
use crate::definition::{Concrete, Definition, Factory, Instance};
use crate::error::{ContainerError, Result};

type Slot = Arc<Mutex<Option<Instance>>>;

/// A secondary registry consulted for identifiers the container doesn't define.
///
/// Lets legacy adapters or a host framework's own registry supply services
/// without the primary container knowing about them up front.
pub trait Delegate: Send + Sync {
    /// Returns true if this delegate can provide the identifier.
    fn has(&self, id: &str) -> bool;

    /// Resolves the identifier, failing with [`ContainerError::NotFound`]
    /// if it isn't provided here.
    fn resolve(&self, id: &str) -> Result<Instance>;
}

/// Dependency-injection container.
///
/// Registration takes `&mut self` and happens during bootstrap; resolution
/// takes `&self` and may run concurrently. The only state touched during
/// resolution is the singleton cache: one slot per shared identifier, each
/// behind its own mutex.
#[derive(Default)]
pub struct Container {
    definitions: HashMap<String, Definition>,
    singletons: Mutex<HashMap<String, Slot>>,
    delegates: Vec<Arc<dyn Delegate>>,
}

impl Container {
    pub fn new() -> Self {
        debug!("Creating new DI container");
        Self::default()
    }

    /// Registers a transient service built by `factory`.
    ///
    /// Re-registering an identifier replaces its definition and drops any
    /// cached singleton for it.
    pub fn add<T, F>(&mut self, id: impl Into<String>, factory: F) -> &mut Definition
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |args: &Arguments| -> Result<Instance> {
            let instance: Instance = Arc::new(factory(args)?);
            Ok(instance)
        });
        self.insert(id.into(), Concrete::Factory(factory))
    }

    /// Registers a shared service: the first resolution is cached and reused.
    pub fn add_shared<T, F>(&mut self, id: impl Into<String>, factory: F) -> &mut Definition
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        self.add(id, factory).set_shared(true)
    }

    /// Registers an already-built instance. Always shared.
    pub fn add_instance<T>(&mut self, id: impl Into<String>, value: T) -> &mut Definition
    where
        T: Any + Send + Sync,
    {
        let instance: Instance = Arc::new(value);
        self.insert(id.into(), Concrete::Instance(instance))
    }

    /// Registers `T::default()` under `T`'s type name, so the type itself is
    /// the lookup key.
    pub fn add_default<T>(&mut self) -> &mut Definition
    where
        T: Default + Any + Send + Sync,
    {
        self.add(std::any::type_name::<T>(), |_| Ok(T::default()))
    }

    /// Appends a delegate consulted, in registration order, for unknown identifiers.
    pub fn delegate(&mut self, delegate: Arc<dyn Delegate>) {
        debug!(delegates = self.delegates.len() + 1, "Delegate added to DI container");
        self.delegates.push(delegate);
    }

    /// Returns true if the identifier is defined here or by any delegate.
    pub fn has(&self, id: &str) -> bool {
        let exists = self.definitions.contains_key(id)
            || self.delegates.iter().any(|delegate| delegate.has(id));
        trace!(service = id, exists, "Checked service existence");
        exists
    }

    /// Returns the definition registered directly under `id`, if any.
    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// Resolves `id` and downcasts it to `T`, injecting every declared
    /// constructor argument recursively.
    pub fn get<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        metrics::counter!("container_resolutions_total").increment(1);

        let instance = self.resolve_with(id, &mut Vec::new())?;
        let result = instance
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                id: id.to_string(),
                expected: std::any::type_name::<T>(),
            });

        match &result {
            Ok(_) => debug!(service = id, "Service resolved successfully"),
            Err(e) => debug!(service = id, error = %e, "Service resolution failed"),
        }

        result
    }

    fn insert(&mut self, id: String, concrete: Concrete) -> &mut Definition {
        self.singletons
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        debug!(service = %id, "Service registered in DI container");
        let definition = Definition::new(id.clone(), concrete);
        match self.definitions.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(definition);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(definition),
        }
    }

    fn resolve_with(&self, id: &str, stack: &mut Vec<String>) -> Result<Instance> {
        let Some(definition) = self.definitions.get(id) else {
            return self.resolve_delegated(id);
        };

        if stack.iter().any(|entry| entry == id) {
            let mut path = stack.clone();
            path.push(id.to_string());
            return Err(ContainerError::CircularDependency {
                id: id.to_string(),
                path,
            });
        }

        if !definition.is_shared() {
            return self.build(definition, stack);
        }

        // The map lock is only held to fetch the slot; the slot lock is held
        // while the factory runs so concurrent first resolutions build once.
        let slot = {
            let mut singletons = self.singletons.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(singletons.entry(id.to_string()).or_default())
        };
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = slot.as_ref() {
            trace!(service = id, "Singleton cache hit");
            return Ok(Arc::clone(instance));
        }

        let instance = self.build(definition, stack)?;
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }

    fn build(&self, definition: &Definition, stack: &mut Vec<String>) -> Result<Instance> {
        match &definition.concrete {
            Concrete::Instance(instance) => Ok(Arc::clone(instance)),
            Concrete::Factory(factory) => {
                stack.push(definition.id().to_string());
                let arguments = self.resolve_arguments(definition, stack);
                stack.pop();
                factory(&arguments?)
            }
        }
    }

    fn resolve_arguments(&self, definition: &Definition, stack: &mut Vec<String>) -> Result<Arguments> {
        let values = definition
            .arguments()
            .iter()
            .map(|dependency| {
                trace!(service = definition.id(), dependency = %dependency, "Resolving constructor argument");
                self.resolve_with(dependency, stack)
                    .map(|instance| (dependency.clone(), instance))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Arguments::new(definition.id(), values))
    }

    fn resolve_delegated(&self, id: &str) -> Result<Instance> {
        match self.delegates.iter().find(|delegate| delegate.has(id)) {
            Some(delegate) => {
                trace!(service = id, "Forwarding resolution to delegate");
                delegate.resolve(id)
            }
            None => Err(ContainerError::NotFound(id.to_string())),
        }
    }
}

impl Delegate for Container {
    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn resolve(&self, id: &str) -> Result<Instance> {
        self.resolve_with(id, &mut Vec::new())
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.definitions.keys().collect();
        ids.sort();
        f.debug_struct("Container")
            .field("definitions", &ids)
            .field("delegates", &self.delegates.len())
            .finish()
    }
}

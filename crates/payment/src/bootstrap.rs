//! Container bootstrap for the payment core.
//!
//! Registers the collaborators and every [`StateKind`] so that
//! [`Service::create_payment`] can always resolve its starting state.

use std::sync::Arc;

use container::{Container, Delegate};

use crate::error::Result;
use crate::payment::DEFAULT_TRANSITION_LIMIT;
use crate::service::Service;
use crate::services::gateway::Gateway;
use crate::services::tokens::TokenStore;
use crate::state::{SharedState, StateKind};
use crate::states::{InitialState, PreparedState};

/// Container identifier of the `Arc<dyn Gateway>` collaborator.
pub const GATEWAY: &str = "gateway";

/// Container identifier of the `Arc<dyn TokenStore>` collaborator.
pub const TOKEN_STORE: &str = "token_store";

/// The payment core's container, populated with its collaborators and states.
#[derive(Debug, Clone)]
pub struct PaymentsContainer {
    container: Arc<Container>,
    transition_limit: usize,
}

impl PaymentsContainer {
    /// Builds the container with the default registrations.
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::builder(gateway, tokens).build()
    }

    pub fn builder(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenStore>) -> PaymentsContainerBuilder {
        PaymentsContainerBuilder::new(gateway, tokens)
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Returns a payment service bound to this container.
    pub fn service(&self) -> Service {
        Service::new(Arc::clone(&self.container)).with_transition_limit(self.transition_limit)
    }

    /// Resolves the token store collaborator.
    pub fn tokens(&self) -> Result<Arc<dyn TokenStore>> {
        let tokens = self.container.get::<Arc<dyn TokenStore>>(TOKEN_STORE)?;
        Ok((*tokens).clone())
    }

    /// Resolves the gateway collaborator.
    pub fn gateway(&self) -> Result<Arc<dyn Gateway>> {
        let gateway = self.container.get::<Arc<dyn Gateway>>(GATEWAY)?;
        Ok((*gateway).clone())
    }
}

/// Builder for [`PaymentsContainer`].
pub struct PaymentsContainerBuilder {
    container: Container,
    transition_limit: usize,
}

impl PaymentsContainerBuilder {
    fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenStore>) -> Self {
        let mut container = Container::new();

        container.add_instance(GATEWAY, gateway);
        container.add_instance(TOKEN_STORE, tokens);

        container.add(StateKind::Initial.as_str(), |_| {
            Ok(Arc::new(InitialState::new()) as SharedState)
        });
        container
            .add(StateKind::Prepared.as_str(), |args| {
                let gateway = args.get::<Arc<dyn Gateway>>(0)?;
                Ok(Arc::new(PreparedState::new((*gateway).clone())) as SharedState)
            })
            .add_argument(GATEWAY);

        Self {
            container,
            transition_limit: DEFAULT_TRANSITION_LIMIT,
        }
    }

    /// Adds a secondary registry consulted for identifiers not registered here.
    pub fn delegate(mut self, delegate: Arc<dyn Delegate>) -> Self {
        self.container.delegate(delegate);
        self
    }

    pub fn transition_limit(mut self, limit: usize) -> Self {
        self.transition_limit = limit;
        self
    }

    /// Runs extra registrations, e.g. replacing a state with a custom one.
    pub fn configure(mut self, configure: impl FnOnce(&mut Container)) -> Self {
        configure(&mut self.container);
        self
    }

    pub fn build(self) -> PaymentsContainer {
        tracing::debug!(
            states = StateKind::ALL.len(),
            transition_limit = self.transition_limit,
            "payments container built"
        );
        PaymentsContainer {
            container: Arc::new(self.container),
            transition_limit: self.transition_limit,
        }
    }
}

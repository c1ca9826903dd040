//! Route table
//!
//! One table maps every `(resource, action, target)` triple to the
//! [`Operation`] that serves it. Each resource module contributes its own
//! slice of [`Route`]s; nothing else in the crate matches on target strings.

use super::{compute, gke, health, network};
use crate::query::{Action, Resource};
use std::collections::HashMap;

/// Target that matches any value for its resource and action; lets `ping` ignore the target
pub const ANY_TARGET: &str = "*";

/// GCP REST service a remote call is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Compute Engine (`compute/v1`)
    Compute,
    /// Kubernetes Engine (`container/v1`)
    Container,
}

/// Description of one remote list/get call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCall {
    pub service: Service,
    /// Path below the service root; `{project}`, `{region}`, `{zone}`,
    /// `{cluster}` and `{arg1}` segments are filled from the client scope
    pub path: &'static str,
    /// Key of the item array in the response. `None` renders the whole
    /// response as a single item.
    pub items_key: Option<&'static str>,
    /// Verb phrase for failure messages ("failed to list instances")
    pub what: &'static str,
}

/// What a routed query does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Liveness check answered locally
    Ping,
    /// Process statistics answered locally
    Stats,
    /// Registered target with no implementation yet
    Pending,
    /// Call a GCP API and render the result
    Remote(RemoteCall),
}

/// One entry contributed by a resource module
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub action: Action,
    pub target: &'static str,
    pub operation: Operation,
}

impl Route {
    pub const fn new(action: Action, target: &'static str, operation: Operation) -> Self {
        Self {
            action,
            target,
            operation,
        }
    }

    /// Shorthand for a `get` route backed by a remote call
    pub const fn remote(
        target: &'static str,
        service: Service,
        path: &'static str,
        items_key: Option<&'static str>,
        what: &'static str,
    ) -> Self {
        Self::new(
            Action::Get,
            target,
            Operation::Remote(RemoteCall {
                service,
                path,
                items_key,
                what,
            }),
        )
    }
}

/// Lookup from `(resource, action, target)` to [`Operation`]
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(Resource, Action, String), Operation>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table every exporter instance serves
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(Resource::Compute, compute::ROUTES);
        table.register(Resource::Network, network::ROUTES);
        table.register(Resource::Gke, gke::ROUTES);
        table.register(Resource::GkeMock, gke::ROUTES);
        table.register(Resource::Health, health::ROUTES);
        table
    }

    /// Add routes for a resource, replacing any existing entry for the same key
    pub fn register(&mut self, resource: Resource, routes: &[Route]) {
        for route in routes {
            self.routes
                .insert((resource, route.action, route.target.to_string()), route.operation);
        }
    }

    /// Find the operation for a triple. An exact target wins over [`ANY_TARGET`].
    pub fn resolve(&self, resource: Resource, action: Action, target: &str) -> Option<Operation> {
        self.routes
            .get(&(resource, action, target.to_string()))
            .or_else(|| self.routes.get(&(resource, action, ANY_TARGET.to_string())))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

//! Resource plugins
//!
//! A plugin answers routed queries for one resource kind. The dispatcher
//! never talks to a plugin directly: it describes what it wants with a
//! [`PluginConfig`], asks the [`PluginFactory`] for a [`ResourceClient`],
//! runs the query once and closes the client.
//!
//! # Architecture
//!
//! - [`routes`] - The single `(resource, action, target)` table
//! - [`compute`], [`network`], [`gke`] - Route registrations for GCP-backed resources
//! - [`cloud`] - Plugin shared by every GCP-backed resource
//! - [`health`] - Local liveness and statistics plugin
//! - [`mock`] - In-memory resource API used by `gke_mock`
//!
//! # Example
//!
//! ```ignore
//! let config = PluginConfig::new(Resource::Compute)
//!     .with_project("my-project-123")
//!     .with_zone("us-central1-a");
//! let client = factory.make_client(config).await?;
//! let text = client.run(&query).await;
//! client.close();
//! ```

pub mod cloud;
pub mod compute;
pub mod gke;
pub mod health;
pub mod mock;
pub mod network;
pub mod routes;

use crate::emitter::{Emitter, NoopEmitter, Sample};
use crate::error::{ExporterError, ExporterResult};
use crate::query::{Action, Query, Resource};
use async_trait::async_trait;
use cloud::CloudPlugin;
use health::{HealthPlugin, HealthStats};
use mock::MockApi;
use routes::{Operation, RouteTable, Service};
use serde_json::Value;
use std::sync::Arc;

/// Capability to read resources from a GCP REST service
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// GET `path` relative to the service root and return the decoded body
    async fn fetch(&self, service: Service, path: &str) -> anyhow::Result<Value>;
}

/// Opens [`ResourceApi`] sessions for clients that need one
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> anyhow::Result<Arc<dyn ResourceApi>>;
}

/// Rendered result of a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    /// Number of items rendered into `text`
    pub items: usize,
}

/// Handler for the operations routed to one resource kind
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn execute(&self, operation: &Operation, query: &Query) -> ExporterResult<Output>;

    /// Release anything held for the query. Nothing is held today.
    fn close(&self) {}
}

/// Where a remote call applies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub project: String,
    pub region: String,
    pub zone: String,
    pub cluster: String,
    pub arg1: String,
}

impl Scope {
    /// Value for a path placeholder name, with the name as a static str
    pub fn lookup(&self, name: &str) -> Option<(&'static str, &str)> {
        match name {
            "project" => Some(("project", &self.project)),
            "region" => Some(("region", &self.region)),
            "zone" => Some(("zone", &self.zone)),
            "cluster" => Some(("cluster", &self.cluster)),
            "arg1" => Some(("arg1", &self.arg1)),
            _ => None,
        }
    }
}

/// Immutable description of the client to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub resource: Resource,
    pub scope: Scope,
    /// Push a metric sample after each successful run
    pub emit: bool,
}

impl PluginConfig {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            scope: Scope::default(),
            emit: false,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.scope.project = project.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.scope.region = region.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.scope.zone = zone.into();
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.scope.cluster = cluster.into();
        self
    }

    pub fn with_arg1(mut self, arg1: impl Into<String>) -> Self {
        self.scope.arg1 = arg1.into();
        self
    }

    pub fn with_emitter(mut self, enabled: bool) -> Self {
        self.emit = enabled;
        self
    }

    /// GCP-backed resources cannot do anything without a project
    pub fn validate(&self) -> ExporterResult<()> {
        if self.resource != Resource::Health && self.scope.project.is_empty() {
            return Err(ExporterError::MissingScope { field: "project" });
        }
        Ok(())
    }
}

/// Builds [`ResourceClient`]s from [`PluginConfig`]s
pub struct PluginFactory {
    sessions: Arc<dyn SessionFactory>,
    emitter: Arc<dyn Emitter>,
    routes: Arc<RouteTable>,
    stats: Arc<HealthStats>,
}

impl PluginFactory {
    pub fn new(sessions: Arc<dyn SessionFactory>, emitter: Arc<dyn Emitter>) -> Self {
        Self {
            sessions,
            emitter,
            routes: Arc::new(RouteTable::standard()),
            stats: Arc::new(HealthStats::new()),
        }
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    pub fn stats(&self) -> &Arc<HealthStats> {
        &self.stats
    }

    /// Resolve a config into a live client.
    ///
    /// Compute, network and GKE clients open a session here; health and
    /// mock GKE clients never touch the network.
    pub async fn make_client(&self, config: PluginConfig) -> ExporterResult<ResourceClient> {
        config.validate()?;

        let resource = config.resource;
        let plugin: Box<dyn Plugin> = match resource {
            Resource::Health => Box::new(HealthPlugin::new(self.stats.clone())),
            Resource::GkeMock => Box::new(CloudPlugin::new(config.scope.clone(), Arc::new(MockApi))),
            Resource::Compute | Resource::Network | Resource::Gke => {
                let api = self
                    .sessions
                    .open()
                    .await
                    .map_err(|e| ExporterError::session(resource, e))?;
                Box::new(CloudPlugin::new(config.scope.clone(), api))
            }
        };

        let emitter: Arc<dyn Emitter> = if config.emit {
            self.emitter.clone()
        } else {
            Arc::new(NoopEmitter)
        };

        tracing::debug!("Built {} client for project '{}'", resource, config.scope.project);

        Ok(ResourceClient {
            resource,
            project: config.scope.project,
            plugin,
            routes: self.routes.clone(),
            emitter,
        })
    }
}

/// A client valid for one query: call [`run`](Self::run), then [`close`](Self::close)
pub struct ResourceClient {
    resource: Resource,
    project: String,
    plugin: Box<dyn Plugin>,
    routes: Arc<RouteTable>,
    emitter: Arc<dyn Emitter>,
}

impl ResourceClient {
    /// Route the query, execute it and emit a sample on success
    pub async fn run(&self, query: &Query) -> ExporterResult<String> {
        let unsupported = || ExporterError::UnsupportedOperation {
            resource: self.resource.to_string(),
            action: query.action.clone(),
            target: query.target.clone(),
        };

        let action: Action = query.action.parse().map_err(|_| unsupported())?;
        let operation = self
            .routes
            .resolve(self.resource, action, &query.target)
            .ok_or_else(unsupported)?;

        if operation == Operation::Pending {
            return Err(ExporterError::NotImplemented {
                target: query.target.clone(),
            });
        }

        let output = self.plugin.execute(&operation, query).await?;

        let sample = Sample {
            resource: self.resource,
            action,
            target: query.target.clone(),
            project: self.project.clone(),
            items: output.items,
        };
        if let Err(e) = self.emitter.emit(&sample).await {
            tracing::warn!("Failed to emit metrics for {} {}: {:#}", self.resource, query.target, e);
        }

        Ok(output.text)
    }

    pub fn close(self) {
        self.plugin.close();
    }
}

//! Query dispatcher
//!
//! Runs the generic checks, then the checks specific to the requested
//! resource, builds a client for it and runs the query.

use crate::error::{ExporterError, ExporterResult};
use crate::plugin::{PluginConfig, PluginFactory};
use crate::query::validator::Validators;
use crate::query::{Query, Resource};

pub struct Dispatcher {
    validators: Validators,
    factory: PluginFactory,
    emit: bool,
}

impl Dispatcher {
    pub fn new(validators: Validators, factory: PluginFactory) -> Self {
        Self {
            validators,
            factory,
            emit: false,
        }
    }

    /// Attach the factory's emitter to every client built from now on
    pub fn with_emitter(mut self, enabled: bool) -> Self {
        self.emit = enabled;
        self
    }

    /// Validate, route and run a query, returning the response payload
    pub async fn dispatch(&self, query: &Query) -> ExporterResult<String> {
        let v = &self.validators;

        if !v.check_resource.validate(&query.resource) {
            return Err(ExporterError::invalid_field("Resource", &query.resource));
        }
        if !v.check_action.validate(&query.action) {
            return Err(ExporterError::invalid_field("Action", &query.action));
        }
        let resource: Resource = query
            .resource
            .parse()
            .map_err(|_| ExporterError::invalid_field("Resource", &query.resource))?;

        self.require("Project", &query.project)?;

        let config = self.plugin_config(resource, query)?;
        self.factory.stats().record_query();

        let client = self.factory.make_client(config).await?;
        let result = client.run(query).await;
        client.close();
        result
    }

    fn require(&self, field: &'static str, value: &str) -> ExporterResult<()> {
        if self.validators.check_len.validate(value) {
            Ok(())
        } else {
            Err(ExporterError::invalid_field(field, value))
        }
    }

    /// Resource-specific field checks and client configuration
    fn plugin_config(&self, resource: Resource, query: &Query) -> ExporterResult<PluginConfig> {
        let config = match resource {
            Resource::Health => PluginConfig::new(resource),
            Resource::Gke | Resource::GkeMock => {
                self.require("Namespace", &query.namespace)?;
                self.require("Target", &query.target)?;
                self.require("Zone", &query.zone)?;
                PluginConfig::new(resource)
                    .with_project(&query.project)
                    .with_zone(&query.zone)
                    .with_cluster(&query.namespace)
                    .with_arg1(&query.arg1)
            }
            Resource::Network => {
                self.require("Namespace", &query.namespace)?;
                self.require("Target", &query.target)?;
                self.require("Region", &query.region)?;
                PluginConfig::new(resource)
                    .with_project(&query.project)
                    .with_region(&query.region)
            }
            Resource::Compute => {
                self.require("Namespace", &query.namespace)?;
                self.require("Target", &query.target)?;
                let len = &self.validators.check_len;
                if !len.validate(&query.region) && !len.validate(&query.zone) {
                    return Err(ExporterError::InvalidLocation {
                        zone: query.zone.clone(),
                        region: query.region.clone(),
                    });
                }
                PluginConfig::new(resource)
                    .with_project(&query.project)
                    .with_region(&query.region)
                    .with_zone(&query.zone)
            }
        };

        Ok(config.with_emitter(self.emit))
    }
}

//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality. This is the real backend behind the
//! [`ResourceApi`] capability used by the compute, network and GKE plugins.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use crate::config::Endpoints;
use crate::plugin::routes::Service;
use crate::plugin::{ResourceApi, SessionFactory};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub endpoints: Endpoints,
}

impl GcpClient {
    pub fn new(credentials: GcpCredentials, endpoints: Endpoints) -> Result<Self> {
        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            endpoints,
        })
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Build the full URL for a path relative to a service root
    pub fn service_url(&self, service: Service, path: &str) -> String {
        let base = match service {
            Service::Compute => &self.endpoints.compute,
            Service::Container => &self.endpoints.container,
        };
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ResourceApi for GcpClient {
    async fn fetch(&self, service: Service, path: &str) -> Result<Value> {
        self.get(&self.service_url(service, path)).await
    }
}

/// Opens sessions against the real GCP APIs.
///
/// Credentials are resolved on first use and shared by every later session,
/// so a host without ADC still serves health queries.
pub struct GcpSessions {
    endpoints: Endpoints,
    access_token: Option<String>,
    client: OnceCell<Arc<GcpClient>>,
}

impl GcpSessions {
    pub fn new(endpoints: Endpoints, access_token: Option<String>) -> Self {
        Self {
            endpoints,
            access_token,
            client: OnceCell::new(),
        }
    }

    async fn connect(&self) -> Result<Arc<GcpClient>> {
        let credentials = match &self.access_token {
            Some(token) => GcpCredentials::with_static_token(token.clone()),
            None => GcpCredentials::new()
                .await
                .context("Failed to initialize GCP credentials")?,
        };
        tracing::info!(
            "GCP session ready (compute: {}, container: {})",
            self.endpoints.compute,
            self.endpoints.container
        );
        Ok(Arc::new(GcpClient::new(credentials, self.endpoints.clone())?))
    }
}

#[async_trait]
impl SessionFactory for GcpSessions {
    async fn open(&self) -> Result<Arc<dyn ResourceApi>> {
        let client = self.client.get_or_try_init(|| self.connect()).await?;
        let api: Arc<dyn ResourceApi> = client.clone();
        Ok(api)
    }
}

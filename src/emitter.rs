//! Metrics emitters
//!
//! After a successful query the client hands a [`Sample`] to its emitter.
//! [`PushGatewayEmitter`] forwards it to a Prometheus Pushgateway;
//! [`NoopEmitter`] stands in when pushing is disabled.

use crate::config::EmitterConfig;
use crate::gcp::http::GcpHttpClient;
use crate::query::{Action, Resource};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of one successful query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub resource: Resource,
    pub action: Action,
    pub target: String,
    pub project: String,
    /// Items rendered into the response
    pub items: usize,
}

#[async_trait]
pub trait Emitter: Send + Sync {
    async fn emit(&self, sample: &Sample) -> Result<()>;
}

pub struct NoopEmitter;

#[async_trait]
impl Emitter for NoopEmitter {
    async fn emit(&self, _sample: &Sample) -> Result<()> {
        Ok(())
    }
}

/// Pushes samples to a Prometheus Pushgateway.
///
/// Each resource/target pair gets its own grouping key, so a push only
/// replaces the metrics of the query that produced it.
pub struct PushGatewayEmitter {
    http: GcpHttpClient,
    url: String,
    job: String,
}

impl PushGatewayEmitter {
    pub fn new(url: impl Into<String>, job: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: GcpHttpClient::new()?,
            url: url.into(),
            job: job.into(),
        })
    }

    /// Grouping-key URL for a sample
    pub fn push_url(&self, sample: &Sample) -> String {
        format!(
            "{}/metrics/job/{}/resource/{}/target/{}",
            self.url.trim_end_matches('/'),
            urlencoding::encode(&self.job),
            urlencoding::encode(sample.resource.as_str()),
            urlencoding::encode(&sample.target),
        )
    }
}

#[async_trait]
impl Emitter for PushGatewayEmitter {
    async fn emit(&self, sample: &Sample) -> Result<()> {
        let body = exposition(sample, chrono::Utc::now().timestamp());
        self.http.put_text(&self.push_url(sample), body).await
    }
}

/// Prometheus text exposition for a sample
pub fn exposition(sample: &Sample, timestamp: i64) -> String {
    let labels = format!(
        "project=\"{}\",action=\"{}\"",
        escape_label(&sample.project),
        sample.action
    );
    format!(
        "# TYPE gcp_exporter_query_items gauge\n\
         gcp_exporter_query_items{{{labels}}} {items}\n\
         # TYPE gcp_exporter_last_success_timestamp_seconds gauge\n\
         gcp_exporter_last_success_timestamp_seconds{{{labels}}} {timestamp}\n",
        labels = labels,
        items = sample.items,
        timestamp = timestamp,
    )
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Emitter selected by configuration
pub fn from_config(config: &EmitterConfig) -> Result<Arc<dyn Emitter>> {
    if config.enabled {
        tracing::info!("Pushing metrics to {} (job {})", config.url, config.job);
        Ok(Arc::new(PushGatewayEmitter::new(&config.url, &config.job)?))
    } else {
        Ok(Arc::new(NoopEmitter))
    }
}

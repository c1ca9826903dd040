//! Health plugin
//!
//! Answers liveness pings and reports statistics about this process.

use super::cloud::render_item;
use super::routes::{Operation, Route, ANY_TARGET};
use super::{Output, Plugin};
use crate::error::{ExporterError, ExporterResult};
use crate::query::{Action, Query, PING_OK};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const ROUTES: &[Route] = &[
    Route::new(Action::Ping, ANY_TARGET, Operation::Ping),
    Route::new(Action::Get, "stats", Operation::Stats),
];

/// Process-wide counters shared by every health client
#[derive(Debug)]
pub struct HealthStats {
    started_at: DateTime<Utc>,
    queries: AtomicU64,
}

impl HealthStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            queries: AtomicU64::new(0),
        }
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn queries_served(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Value {
        let uptime = (Utc::now() - self.started_at).num_seconds().max(0);
        json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": crate::VERSION,
            "started_at": self.started_at.to_rfc3339(),
            "uptime_seconds": uptime,
            "queries_served": self.queries_served(),
        })
    }
}

impl Default for HealthStats {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HealthPlugin {
    stats: Arc<HealthStats>,
}

impl HealthPlugin {
    pub fn new(stats: Arc<HealthStats>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Plugin for HealthPlugin {
    async fn execute(&self, operation: &Operation, query: &Query) -> ExporterResult<Output> {
        match operation {
            Operation::Ping => Ok(Output {
                text: PING_OK.to_string(),
                items: 0,
            }),
            Operation::Stats => Ok(Output {
                text: render_item(&self.stats.snapshot())?,
                items: 1,
            }),
            _ => Err(ExporterError::UnsupportedOperation {
                resource: query.resource.clone(),
                action: query.action.clone(),
                target: query.target.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_is_ok() {
        let plugin = HealthPlugin::new(Arc::new(HealthStats::new()));
        let output = plugin.execute(&Operation::Ping, &Query::default()).await.unwrap();
        assert_eq!(output.text, "ok");
    }

    #[tokio::test]
    async fn test_stats_reports_queries() {
        let stats = Arc::new(HealthStats::new());
        stats.record_query();
        stats.record_query();
        let plugin = HealthPlugin::new(stats);

        let output = plugin.execute(&Operation::Stats, &Query::default()).await.unwrap();
        let value: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(value["queries_served"], 2);
        assert_eq!(value["service"], "gcp-exporter");
        assert!(value["uptime_seconds"].as_i64().unwrap() >= 0);
        assert!(output.text.contains("\n\t\""));
    }
}

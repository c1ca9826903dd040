//! Plugin for GCP-backed resources
//!
//! Compute, network and GKE differ only in their routes, so one plugin
//! serves all of them: expand the call's path against the scope, fetch,
//! and render each returned item as tab-indented JSON.

use super::routes::{Operation, RemoteCall};
use super::{Output, Plugin, ResourceApi, Scope};
use crate::error::{ExporterError, ExporterResult};
use crate::query::Query;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::sync::Arc;

pub struct CloudPlugin {
    scope: Scope,
    api: Arc<dyn ResourceApi>,
}

impl CloudPlugin {
    pub fn new(scope: Scope, api: Arc<dyn ResourceApi>) -> Self {
        Self { scope, api }
    }

    async fn call(&self, call: &RemoteCall) -> ExporterResult<Output> {
        let path = expand_path(call.path, &self.scope)?;

        let response = self
            .api
            .fetch(call.service, &path)
            .await
            .map_err(|e| ExporterError::remote(call.what, e))?;

        let items: Vec<&Value> = match call.items_key {
            Some(key) => response
                .get(key)
                .and_then(Value::as_array)
                .map(|items| items.iter().collect())
                .unwrap_or_default(),
            None => vec![&response],
        };

        tracing::debug!("{}: {} item(s) from {}", call.what, items.len(), path);

        let mut text = String::new();
        for item in &items {
            text.push_str(&render_item(item)?);
        }

        Ok(Output {
            text,
            items: items.len(),
        })
    }
}

#[async_trait]
impl Plugin for CloudPlugin {
    async fn execute(&self, operation: &Operation, query: &Query) -> ExporterResult<Output> {
        match operation {
            Operation::Remote(call) => self.call(call).await,
            _ => Err(ExporterError::UnsupportedOperation {
                resource: query.resource.clone(),
                action: query.action.clone(),
                target: query.target.clone(),
            }),
        }
    }
}

/// Fill `{name}` segments of a path template from the scope.
/// Values are percent-encoded; an empty value is a missing scope.
pub fn expand_path(template: &str, scope: &Scope) -> ExporterResult<String> {
    let segments = template
        .split('/')
        .map(|segment| {
            let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
                return Ok(segment.to_string());
            };
            match scope.lookup(name) {
                Some((_, value)) if !value.is_empty() => Ok(urlencoding::encode(value).into_owned()),
                Some((field, _)) => Err(ExporterError::MissingScope { field }),
                None => Err(ExporterError::MissingScope { field: "path" }),
            }
        })
        .collect::<ExporterResult<Vec<_>>>()?;

    Ok(segments.join("/"))
}

/// Canonical JSON for one item, indented with tabs
pub fn render_item(item: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    item.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::routes::{RouteTable, Service};
    use crate::query::{Action, Resource};
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a fixed body and records requested paths
    struct FixedApi {
        body: Value,
        paths: Mutex<Vec<(Service, String)>>,
    }

    impl FixedApi {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                paths: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ResourceApi for FixedApi {
        async fn fetch(&self, service: Service, path: &str) -> anyhow::Result<Value> {
            self.paths.lock().unwrap().push((service, path.to_string()));
            Ok(self.body.clone())
        }
    }

    struct FailingApi;

    #[async_trait]
    impl ResourceApi for FailingApi {
        async fn fetch(&self, _service: Service, _path: &str) -> anyhow::Result<Value> {
            Err(anyhow::anyhow!("API request failed: 500 Internal Server Error"))
        }
    }

    fn full_scope() -> Scope {
        Scope {
            project: "my-project".to_string(),
            region: "us-central1".to_string(),
            zone: "us-central1-a".to_string(),
            cluster: "cluster-1".to_string(),
            arg1: "default-pool".to_string(),
        }
    }

    fn query(resource: &str, target: &str) -> Query {
        Query {
            resource: resource.to_string(),
            action: "get".to_string(),
            target: target.to_string(),
            ..Default::default()
        }
    }

    fn remote(resource: Resource, target: &str) -> Operation {
        RouteTable::standard()
            .resolve(resource, Action::Get, target)
            .unwrap()
    }

    #[test]
    fn test_render_item_uses_tabs() {
        let text = render_item(&json!({"name": "vm-1", "tags": ["a"]})).unwrap();
        assert_eq!(text, "{\n\t\"name\": \"vm-1\",\n\t\"tags\": [\n\t\t\"a\"\n\t]\n}");
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path(
            "projects/{project}/zones/{zone}/clusters/{cluster}/nodePools/{arg1}",
            &full_scope(),
        )
        .unwrap();
        assert_eq!(
            path,
            "projects/my-project/zones/us-central1-a/clusters/cluster-1/nodePools/default-pool"
        );
    }

    #[test]
    fn test_expand_path_encodes_values() {
        let scope = Scope {
            arg1: "pool/../x y".to_string(),
            ..full_scope()
        };
        let path = expand_path("nodePools/{arg1}", &scope).unwrap();
        assert_eq!(path, "nodePools/pool%2F..%2Fx%20y");
    }

    #[test]
    fn test_expand_path_missing_scope() {
        let scope = Scope {
            zone: String::new(),
            ..full_scope()
        };
        let err = expand_path("projects/{project}/zones/{zone}/instances", &scope).unwrap_err();
        assert!(matches!(err, ExporterError::MissingScope { field: "zone" }));
    }

    #[test]
    fn test_every_route_expands_with_full_scope() {
        let table = RouteTable::standard();
        for (resource, targets) in [
            (Resource::Compute, crate::plugin::compute::ROUTES),
            (Resource::Network, crate::plugin::network::ROUTES),
            (Resource::Gke, crate::plugin::gke::ROUTES),
        ] {
            for route in targets {
                if let Some(Operation::Remote(call)) = table.resolve(resource, route.action, route.target) {
                    let path = expand_path(call.path, &full_scope()).unwrap();
                    assert!(!path.contains('{'), "{} left placeholders: {}", route.target, path);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_list_renders_items_in_order() {
        let api = FixedApi::new(json!({
            "items": [{"name": "b"}, {"name": "a"}, {"name": "c"}]
        }));
        let plugin = CloudPlugin::new(full_scope(), api.clone());
        let output = plugin
            .execute(&remote(Resource::Compute, "instances.list"), &query("compute", "instances.list"))
            .await
            .unwrap();

        assert_eq!(output.items, 3);
        let b = output.text.find("\"b\"").unwrap();
        let a = output.text.find("\"a\"").unwrap();
        let c = output.text.find("\"c\"").unwrap();
        assert!(b < a && a < c);

        let paths = api.paths.lock().unwrap();
        assert_eq!(
            paths[0],
            (Service::Compute, "projects/my-project/zones/us-central1-a/instances".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_items_key_is_empty() {
        let api = FixedApi::new(json!({"kind": "compute#instanceList"}));
        let plugin = CloudPlugin::new(full_scope(), api);
        let output = plugin
            .execute(&remote(Resource::Compute, "regions.list"), &query("compute", "regions.list"))
            .await
            .unwrap();
        assert_eq!(output.items, 0);
        assert!(output.text.is_empty());
    }

    #[tokio::test]
    async fn test_get_renders_whole_response() {
        let api = FixedApi::new(json!({"name": "default-pool", "initialNodeCount": 3}));
        let plugin = CloudPlugin::new(full_scope(), api.clone());
        let output = plugin
            .execute(&remote(Resource::Gke, "nodepools.get"), &query("gke", "nodepools.get"))
            .await
            .unwrap();
        assert_eq!(output.items, 1);
        let parsed: Value = serde_json::from_str(&output.text).unwrap();
        assert_eq!(parsed["initialNodeCount"], 3);
        assert_eq!(api.paths.lock().unwrap()[0].0, Service::Container);
    }

    #[tokio::test]
    async fn test_remote_failure_carries_prefix() {
        let plugin = CloudPlugin::new(full_scope(), Arc::new(FailingApi));
        let err = plugin
            .execute(&remote(Resource::Network, "firewalls.list"), &query("network", "firewalls.list"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to list firewalls: "));
        assert_eq!(
            err.response_text(),
            "failed to list firewalls: GCP service temporarily unavailable. Please try again.\n"
        );
    }

    #[tokio::test]
    async fn test_local_operation_is_unsupported() {
        let plugin = CloudPlugin::new(full_scope(), Arc::new(FailingApi));
        let err = plugin
            .execute(&Operation::Ping, &query("compute", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExporterError::UnsupportedOperation { .. }));
    }
}

//! Canned resource API for dry runs
//!
//! Answers GKE container paths with fixtures built from the path itself.
//! Never performs I/O.

use super::routes::Service;
use super::ResourceApi;
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct MockApi;

#[async_trait]
impl ResourceApi for MockApi {
    async fn fetch(&self, service: Service, path: &str) -> anyhow::Result<Value> {
        tracing::debug!("mock GET {:?} {}", service, path);

        let segments: Vec<&str> = path.split('/').collect();
        let value_after = |key: &str| {
            segments
                .iter()
                .position(|s| *s == key)
                .and_then(|i| segments.get(i + 1))
                .copied()
                .unwrap_or("")
        };
        let project = value_after("projects");
        let zone = value_after("zones");
        let cluster = value_after("clusters");

        match (service, segments.as_slice()) {
            (Service::Container, [.., "clusters"]) => Ok(json!({
                "clusters": [cluster_fixture("mock-cluster", zone)]
            })),
            (Service::Container, [.., "nodePools"]) => Ok(json!({
                "nodePools": [
                    node_pool_fixture("default-pool", cluster, 3),
                    node_pool_fixture("mock-pool", cluster, 1),
                ]
            })),
            (Service::Container, [.., "nodePools", name]) => Ok(node_pool_fixture(name, cluster, 3)),
            (Service::Container, [.., "usableSubnetworks"]) => Ok(json!({
                "subnetworks": [{
                    "subnetwork": format!("projects/{}/regions/us-central1/subnetworks/default", project),
                    "network": format!("projects/{}/global/networks/default", project),
                    "ipCidrRange": "10.128.0.0/20",
                    "statusMessage": ""
                }]
            })),
            _ => Err(anyhow::anyhow!("No mock fixture for {:?} {}", service, path)),
        }
    }
}

fn cluster_fixture(name: &str, zone: &str) -> Value {
    json!({
        "name": name,
        "location": zone,
        "zone": zone,
        "status": "RUNNING",
        "currentMasterVersion": "1.29.1-gke.1589000",
        "currentNodeCount": 3
    })
}

fn node_pool_fixture(name: &str, cluster: &str, nodes: u32) -> Value {
    json!({
        "name": name,
        "cluster": cluster,
        "status": "RUNNING",
        "initialNodeCount": nodes,
        "config": {
            "machineType": "e2-medium",
            "diskSizeGb": 100
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clusters_fixture_uses_zone() {
        let value = MockApi
            .fetch(Service::Container, "projects/p/zones/europe-west1-b/clusters")
            .await
            .unwrap();
        assert_eq!(value["clusters"][0]["zone"], "europe-west1-b");
    }

    #[tokio::test]
    async fn test_node_pool_get_uses_name() {
        let value = MockApi
            .fetch(Service::Container, "projects/p/zones/z/clusters/c1/nodePools/pool-x")
            .await
            .unwrap();
        assert_eq!(value["name"], "pool-x");
        assert_eq!(value["cluster"], "c1");
    }

    #[tokio::test]
    async fn test_compute_paths_have_no_fixture() {
        assert!(MockApi
            .fetch(Service::Compute, "projects/p/regions")
            .await
            .is_err());
    }
}

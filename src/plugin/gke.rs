//! Kubernetes Engine routes
//!
//! @see https://cloud.google.com/kubernetes-engine/docs/reference/rest/
//!
//! Registered for both `gke` and `gke_mock`; the mock differs only in the
//! resource API it is built with.

use super::routes::{Operation, Route, Service};
use crate::query::Action;

pub const ROUTES: &[Route] = &[
    // TODO: pods.list needs a Kubernetes API client for the cluster endpoint
    Route::new(Action::Get, "pods.list", Operation::Pending),
    // Lists the clusters in the zone
    Route::remote(
        "services.list",
        Service::Container,
        "projects/{project}/zones/{zone}/clusters",
        Some("clusters"),
        "list clusters",
    ),
    Route::remote(
        "nodepools.list",
        Service::Container,
        "projects/{project}/zones/{zone}/clusters/{cluster}/nodePools",
        Some("nodePools"),
        "list node pools",
    ),
    // arg1 is the node pool name
    Route::remote(
        "nodepools.get",
        Service::Container,
        "projects/{project}/zones/{zone}/clusters/{cluster}/nodePools/{arg1}",
        None,
        "get node pool",
    ),
    Route::remote(
        "usablesubnets.list",
        Service::Container,
        "projects/{project}/aggregated/usableSubnetworks",
        None,
        "list usable subnetworks",
    ),
];

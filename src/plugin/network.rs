//! VPC networking routes, served by the Compute Engine API

use super::routes::{Route, Service};

pub const ROUTES: &[Route] = &[
    Route::remote(
        "subnets.list",
        Service::Compute,
        "projects/{project}/regions/{region}/subnetworks",
        Some("items"),
        "list subnetworks",
    ),
    Route::remote(
        "firewalls.list",
        Service::Compute,
        "projects/{project}/global/firewalls",
        Some("items"),
        "list firewalls",
    ),
    Route::remote(
        "addresses.list",
        Service::Compute,
        "projects/{project}/regions/{region}/addresses",
        Some("items"),
        "list addresses",
    ),
    Route::remote(
        "globaladdresses.list",
        Service::Compute,
        "projects/{project}/global/addresses",
        Some("items"),
        "list global addresses",
    ),
    Route::remote(
        "networks.list",
        Service::Compute,
        "projects/{project}/global/networks",
        Some("items"),
        "list networks",
    ),
    Route::remote(
        "routers.list",
        Service::Compute,
        "projects/{project}/regions/{region}/routers",
        Some("items"),
        "list routers",
    ),
    Route::remote(
        "routes.list",
        Service::Compute,
        "projects/{project}/global/routes",
        Some("items"),
        "list routes",
    ),
    Route::remote(
        "interconnects.list",
        Service::Compute,
        "projects/{project}/global/interconnects",
        Some("items"),
        "list interconnects",
    ),
];

//! Compute Engine routes
//!
//! @see https://cloud.google.com/compute/docs/reference/rest/v1/

use super::routes::{Route, Service};

pub const ROUTES: &[Route] = &[
    Route::remote(
        "regions.list",
        Service::Compute,
        "projects/{project}/regions",
        Some("items"),
        "list regions",
    ),
    Route::remote(
        "instances.list",
        Service::Compute,
        "projects/{project}/zones/{zone}/instances",
        Some("items"),
        "list instances",
    ),
];

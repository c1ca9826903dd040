//! HTTP-triggered exporter that answers small JSON queries about GCP
//! compute, network and GKE resources.
//!
//! A request flows through [`server`] into the [`dispatch::Dispatcher`],
//! which validates it, builds a [`plugin::ResourceClient`] for the named
//! resource and returns the rendered JSON items as text.

pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod gcp;
pub mod plugin;
pub mod query;
pub mod server;

/// Version injected at compile time via GCP_EXPORTER_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCP_EXPORTER_VERSION") {
    Some(v) => v,
    None => "dev",
};

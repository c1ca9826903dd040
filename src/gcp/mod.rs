//! GCP API interaction module
//!
//! This module provides the real backend for the exporter: authentication,
//! an HTTP client, and the session factory handed to the plugins.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - GCP client implementing the plugin resource API
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use gcp_exporter::gcp::client::GcpSessions;
//! use gcp_exporter::config::Endpoints;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let sessions = GcpSessions::new(Endpoints::default(), None);
//!     let api = sessions.open().await?;
//!     let regions = api.fetch(Service::Compute, "projects/my-project/regions").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

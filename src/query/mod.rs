//! Query model
//!
//! The wire-level request accepted by the exporter, plus the closed sets of
//! resources and actions it understands.
//!
//! # Module Structure
//!
//! - [`validator`] - Charset, length and allow-list checks applied before dispatch

pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length accepted for any validated query field
pub const REQUEST_MAX_LEN: usize = 50;

/// Response text for a health ping
pub const PING_OK: &str = "ok";

/// Resources a query may name
pub const QUERY_RESOURCES: &[&str] = &["gke", "gke_mock", "health", "network", "compute"];

/// Actions a query may name
pub const QUERY_ACTIONS: &[&str] = &["get", "ping"];

/// A single lookup request, decoded from the JSON body.
///
/// Missing fields decode as empty strings so that field-presence checks are
/// done by the validators rather than by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub resource: String,
    pub project: String,
    pub zone: String,
    pub region: String,
    pub action: String,
    /// Cluster name for GKE queries
    pub namespace: String,
    /// Dotted operation identifier, e.g. `instances.list`
    pub target: String,
    /// Optional argument; its meaning depends on `target`
    pub arg1: String,
}

impl Query {
    /// Decode a query from a raw JSON body
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

/// Resource kind a query is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Gke,
    GkeMock,
    Health,
    Network,
    Compute,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Gke => "gke",
            Resource::GkeMock => "gke_mock",
            Resource::Health => "health",
            Resource::Network => "network",
            Resource::Compute => "compute",
        }
    }

    /// Name used in client-construction diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Gke => "GKE",
            Resource::GkeMock => "mock GKE",
            Resource::Health => "Health",
            Resource::Network => "Network",
            Resource::Compute => "Compute",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gke" => Ok(Resource::Gke),
            "gke_mock" => Ok(Resource::GkeMock),
            "health" => Ok(Resource::Health),
            "network" => Ok(Resource::Network),
            "compute" => Ok(Resource::Compute),
            other => Err(format!("unknown resource: {}", other)),
        }
    }
}

/// Verb applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Get,
    Ping,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Ping => "ping",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "ping" => Ok(Action::Ping),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let query = Query::from_json(br#"{"resource": "health", "action": "ping"}"#).unwrap();
        assert_eq!(query.resource, "health");
        assert_eq!(query.action, "ping");
        assert!(query.project.is_empty());
        assert!(query.arg1.is_empty());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Query::from_json(b"{not json").is_err());
    }

    #[test]
    fn test_resource_names_match_allow_list() {
        for name in QUERY_RESOURCES {
            let resource: Resource = name.parse().unwrap();
            assert_eq!(resource.as_str(), *name);
        }
        assert!("storage".parse::<Resource>().is_err());
    }

    #[test]
    fn test_action_names_match_allow_list() {
        for name in QUERY_ACTIONS {
            let action: Action = name.parse().unwrap();
            assert_eq!(action.as_str(), *name);
        }
        assert!("delete".parse::<Action>().is_err());
    }
}

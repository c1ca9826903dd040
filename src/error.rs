//! Exporter error types and response-text formatting.

use crate::gcp::http::format_gcp_error;
use crate::query::Resource;
use thiserror::Error;

/// Result type for dispatcher and plugin operations.
pub type ExporterResult<T> = Result<T, ExporterError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can stop a query from producing a payload.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Request body was not a valid query
    #[error("{0}")]
    MalformedQuery(#[source] serde_json::Error),

    /// A field failed its validation chain
    #[error("[debug] {field} ({value}) failed validations")]
    InvalidField { field: &'static str, value: String },

    /// Neither location field passed validation
    #[error("[debug] Both Zone ({zone}) and Region ({region}) failed validations")]
    InvalidLocation { zone: String, region: String },

    /// A call needs a scope field the client was not configured with
    #[error("[debug] {field} is required for this target")]
    MissingScope { field: &'static str },

    /// The remote session could not be opened
    #[error("Error creating {} client: {source}", .resource.display_name())]
    Session {
        resource: Resource,
        #[source]
        source: BoxError,
    },

    /// The remote API call failed
    #[error("failed to {what}: {source}")]
    Remote {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    /// An item could not be rendered; the whole batch is dropped
    #[error("failed to serialize item: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No route exists for the resource/action/target triple
    #[error("[debug] unsupported operation: {resource} {action} {target}")]
    UnsupportedOperation {
        resource: String,
        action: String,
        target: String,
    },

    /// The route exists but has no implementation yet
    #[error("[debug] {target} is not implemented yet")]
    NotImplemented { target: String },
}

impl ExporterError {
    pub fn invalid_field(field: &'static str, value: &str) -> Self {
        ExporterError::InvalidField {
            field,
            value: value.to_string(),
        }
    }

    pub fn remote(what: &'static str, error: anyhow::Error) -> Self {
        ExporterError::Remote {
            what,
            source: error.into(),
        }
    }

    pub fn session(resource: Resource, error: anyhow::Error) -> Self {
        ExporterError::Session {
            resource,
            source: error.into(),
        }
    }

    /// Single line shown to the caller.
    /// Remote and session failures are sanitised so raw API bodies never leak.
    pub fn response_text(&self) -> String {
        match self {
            ExporterError::Session { resource, source } => format!(
                "Error creating {} client: {}\n",
                resource.display_name(),
                sanitize(source.as_ref())
            ),
            ExporterError::Remote { what, source } => {
                format!("failed to {}: {}\n", what, sanitize(source.as_ref()))
            }
            other => format!("{}\n", other),
        }
    }
}

fn sanitize(error: &(dyn std::error::Error + Send + Sync)) -> String {
    format_gcp_error(&anyhow::anyhow!("{}", error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_text() {
        let err = ExporterError::invalid_field("Project", "bad project");
        assert_eq!(
            err.response_text(),
            "[debug] Project (bad project) failed validations\n"
        );
    }

    #[test]
    fn test_invalid_location_text() {
        let err = ExporterError::InvalidLocation {
            zone: String::new(),
            region: String::new(),
        };
        assert_eq!(
            err.response_text(),
            "[debug] Both Zone () and Region () failed validations\n"
        );
    }

    #[test]
    fn test_remote_text_is_sanitized() {
        let err = ExporterError::remote(
            "list instances",
            anyhow::anyhow!("API request failed: 403 Forbidden"),
        );
        assert_eq!(
            err.response_text(),
            "failed to list instances: Permission denied. Check your GCP IAM permissions.\n"
        );
        // The full error is kept for logging
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_session_text_names_client() {
        let err = ExporterError::session(Resource::Gke, anyhow::anyhow!("no credentials"));
        assert_eq!(
            err.response_text(),
            "Error creating GKE client: no credentials\n"
        );
    }
}

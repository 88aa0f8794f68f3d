//! Redirection error types.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for redirection operations.
pub type RedirectResult<T> = Result<T, RedirectError>;

/// Hard failures surfaced to the caller of the resolver.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// Redirection was attempted and the server answered, but assigned no
    /// usable host.
    #[error("no cluster targets returned by {endpoint}")]
    NoClusterTargets { endpoint: String },

    #[error("unable to dial {endpoint} for regional redirection: {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: cv_grpc::DialError,
    },

    #[error("unable to get assignment from {endpoint}: {source}")]
    Rpc {
        endpoint: String,
        #[source]
        source: tonic::Status,
    },

    #[error("regional redirection via {endpoint} timed out after {after:?}")]
    Timeout { endpoint: String, after: Duration },
}

impl RedirectError {
    pub fn is_no_cluster_targets(&self) -> bool {
        matches!(self, RedirectError::NoClusterTargets { .. })
    }

    /// The endpoint the failed operation was addressed to.
    pub fn endpoint(&self) -> &str {
        match self {
            RedirectError::NoClusterTargets { endpoint }
            | RedirectError::Dial { endpoint, .. }
            | RedirectError::Rpc { endpoint, .. }
            | RedirectError::Timeout { endpoint, .. } => endpoint,
        }
    }
}

/// Outcome of an assignment lookup that did not produce clusters.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The server has no assignment service. Not a failure for callers:
    /// redirection is simply unavailable.
    #[error("assignment service is not implemented at {endpoint}")]
    Unimplemented { endpoint: String },

    #[error(transparent)]
    Failed(#[from] RedirectError),
}

impl QueryError {
    /// Classify an RPC status returned by `endpoint`.
    pub fn from_status(endpoint: &str, status: tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unimplemented => QueryError::Unimplemented {
                endpoint: endpoint.to_string(),
            },
            _ => QueryError::Failed(RedirectError::Rpc {
                endpoint: endpoint.to_string(),
                source: status,
            }),
        }
    }
}

//! Assignment lookup. Asks an endpoint which clusters serve the caller.
//!
//! The lookup opens its own connection, makes a single `GetOne` call with
//! an empty key (the server identifies the caller from its credentials),
//! and drops the connection before returning. It is never reused for
//! regular traffic.

use cv_grpc::DialOptions;
use tracing::debug;

use crate::cluster::ClusterSet;
use crate::error::{QueryError, RedirectError};
use crate::proto;
use crate::proto::assignment_service_client::AssignmentServiceClient;

/// Source of cluster assignments.
#[tonic::async_trait]
pub trait AssignmentQuery: Send + Sync {
    /// Fetch the clusters assigned to the caller identified by `options`.
    async fn query(&self, endpoint: &str, options: &DialOptions)
    -> Result<ClusterSet, QueryError>;
}

/// Looks up assignments over gRPC from `arista.redirector.v1.AssignmentService`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrpcAssignmentQuery;

#[tonic::async_trait]
impl AssignmentQuery for GrpcAssignmentQuery {
    async fn query(
        &self,
        endpoint: &str,
        options: &DialOptions,
    ) -> Result<ClusterSet, QueryError> {
        let channel = options
            .dial(endpoint)
            .await
            .map_err(|source| RedirectError::Dial {
                endpoint: endpoint.to_string(),
                source,
            })?;

        // The client owns the only handle to the channel; it is released
        // when this function returns, on success or error.
        let mut client = AssignmentServiceClient::with_interceptor(channel, options.interceptor());

        // Key left unset: the default assignment for the calling identity.
        let response = client
            .get_one(proto::AssignmentRequest { key: None })
            .await
            .map_err(|status| QueryError::from_status(endpoint, status))?;

        let clusters = ClusterSet::from_assignment(response.into_inner().value);
        debug!(%endpoint, clusters = clusters.len(), "assignment received");
        Ok(clusters)
    }
}

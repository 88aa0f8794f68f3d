//! Assignment gRPC server serving a fixed assignment to every caller.
//!
//! Implements `AssignmentService` over a static [`ClusterSet`]. Useful as a
//! local redirector during development and as the remote end in tests.

use tonic::{Request, Response, Status};
use tracing::debug;

use crate::cluster::ClusterSet;
use crate::proto;
use crate::proto::assignment_service_server::AssignmentService;

/// gRPC assignment service returning the same clusters to every caller.
#[derive(Debug, Clone, Default)]
pub struct StaticAssignmentService {
    clusters: ClusterSet,
}

impl StaticAssignmentService {
    pub fn new(clusters: ClusterSet) -> Self {
        Self { clusters }
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    /// Get the tonic service for mounting on a gRPC server.
    pub fn into_service(self) -> proto::assignment_service_server::AssignmentServiceServer<Self> {
        proto::assignment_service_server::AssignmentServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl AssignmentService for StaticAssignmentService {
    async fn get_one(
        &self,
        request: Request<proto::AssignmentRequest>,
    ) -> Result<Response<proto::AssignmentResponse>, Status> {
        let remote = request.remote_addr();
        let req = request.into_inner();

        debug!(
            remote = ?remote,
            clusters = self.clusters.len(),
            "serving assignment"
        );

        Ok(Response::new(proto::AssignmentResponse {
            value: Some(proto::Assignment {
                key: req.key,
                clusters: Some(self.clusters.to_proto()),
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_one_returns_clusters_in_order() {
        let clusters = ClusterSet::from(vec![
            vec!["a1".to_string(), "a2".to_string()],
            vec!["b1".to_string()],
        ]);
        let service = StaticAssignmentService::new(clusters.clone());

        let response = service
            .get_one(Request::new(proto::AssignmentRequest { key: None }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(ClusterSet::from_assignment(response.value), clusters);
    }

    #[tokio::test]
    async fn get_one_echoes_key() {
        let service = StaticAssignmentService::default();
        let key = proto::AssignmentKey {
            system_id: "SN-1234".to_string(),
        };

        let response = service
            .get_one(Request::new(proto::AssignmentRequest {
                key: Some(key.clone()),
            }))
            .await
            .unwrap()
            .into_inner();

        let value = response.value.unwrap();
        assert_eq!(value.key, Some(key));
        assert!(ClusterSet::from_assignment(Some(value)).is_empty());
    }
}

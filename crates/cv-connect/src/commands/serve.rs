//! `cvconnect serve`: a local regional redirector.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use cv_redirector::{AssignmentTable, StaticAssignmentService};
use tracing::{info, warn};

pub async fn serve(listen: SocketAddr, assignments: &Path) -> anyhow::Result<()> {
    let table = AssignmentTable::from_file(assignments)
        .with_context(|| format!("loading assignments from {}", assignments.display()))?;
    let clusters = table.cluster_set();

    match clusters.select_target() {
        Some(home) => info!(clusters = clusters.len(), %home, "assignment table loaded"),
        None => warn!("assignment table has no home host; clients will see no cluster targets"),
    }

    let service = StaticAssignmentService::new(clusters);
    info!(%listen, "assignment server starting");

    tonic::transport::Server::builder()
        .add_service(service.into_service())
        .serve_with_shutdown(listen, async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    warn!(error = %e, "failed to install CTRL+C handler");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("assignment server stopped");
    Ok(())
}

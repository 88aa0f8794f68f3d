//! Regional redirection resolver.
//!
//! Decides which host a connection attempt should actually dial. Each call
//! is a single pass with no retries and no cached state:
//!
//! ```text
//! toggle disabled ──────────────────────────────► original endpoint
//! query ── Unimplemented ───────────────────────► original endpoint
//!       ── other error ─────────────────────────► error
//!       ── clusters ── no usable home host ─────► NoClusterTargets
//!                   └─ first host of home cluster ► redirected endpoint
//! ```

use std::fmt;
use std::time::Duration;

use cv_grpc::DialOptions;
use tracing::{debug, info};

use crate::error::{QueryError, RedirectError, RedirectResult};
use crate::query::{AssignmentQuery, GrpcAssignmentQuery};
use crate::toggle::RedirectToggle;

/// Why a resolution produced its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Redirection is turned off; the original endpoint is used as-is.
    Disabled,
    /// The server does not implement the assignment service.
    Unimplemented,
    /// The server assigned a host.
    Redirected,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reason::Disabled => "redirection disabled",
            Reason::Unimplemented => "redirection not supported by server",
            Reason::Redirected => "redirected",
        })
    }
}

/// The endpoint chosen for a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    endpoint: String,
    reason: Reason,
}

impl Resolution {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// True when the endpoint came from a server assignment.
    pub fn is_redirected(&self) -> bool {
        self.reason == Reason::Redirected
    }

    pub fn into_endpoint(self) -> String {
        self.endpoint
    }
}

/// Resolves a logical CloudVision endpoint to the host to dial.
#[derive(Debug, Clone)]
pub struct RedirectionResolver<Q = GrpcAssignmentQuery> {
    query: Q,
    toggle: RedirectToggle,
    timeout: Option<Duration>,
}

impl RedirectionResolver<GrpcAssignmentQuery> {
    /// A resolver that looks up assignments over gRPC.
    pub fn new(toggle: RedirectToggle) -> Self {
        Self::with_query(GrpcAssignmentQuery, toggle)
    }
}

impl<Q: AssignmentQuery> RedirectionResolver<Q> {
    pub fn with_query(query: Q, toggle: RedirectToggle) -> Self {
        Self {
            query,
            toggle,
            timeout: None,
        }
    }

    /// Bound the assignment lookup. Expiry is a hard error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn toggle(&self) -> RedirectToggle {
        self.toggle
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Resolve `endpoint` to the host that should be dialed.
    ///
    /// `options` are forwarded to the lookup connection so it presents the
    /// same identity as the real connection will.
    pub async fn resolve(
        &self,
        endpoint: &str,
        options: &DialOptions,
    ) -> RedirectResult<Resolution> {
        if !self.toggle.is_enabled() {
            debug!(%endpoint, "regional redirection disabled");
            return Ok(Resolution {
                endpoint: endpoint.to_string(),
                reason: Reason::Disabled,
            });
        }

        let lookup = self.query.query(endpoint, options);
        let result = match self.timeout {
            Some(after) => tokio::time::timeout(after, lookup)
                .await
                .map_err(|_| RedirectError::Timeout {
                    endpoint: endpoint.to_string(),
                    after,
                })?,
            None => lookup.await,
        };

        let clusters = match result {
            Ok(clusters) => clusters,
            Err(QueryError::Unimplemented { .. }) => {
                info!(%endpoint, "server does not support regional redirection, using original endpoint");
                return Ok(Resolution {
                    endpoint: endpoint.to_string(),
                    reason: Reason::Unimplemented,
                });
            }
            Err(QueryError::Failed(err)) => return Err(err),
        };

        let target = clusters
            .select_target()
            .ok_or_else(|| RedirectError::NoClusterTargets {
                endpoint: endpoint.to_string(),
            })?;

        info!(%endpoint, resolved = %target, clusters = clusters.len(), "regional redirection resolved");
        Ok(Resolution {
            endpoint: target.to_string(),
            reason: Reason::Redirected,
        })
    }
}

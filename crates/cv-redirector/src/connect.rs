//! Resolve-then-connect.
//!
//! Runs an endpoint through the [`RedirectionResolver`] and dials whatever
//! it picks, using the same options for the lookup and for the final
//! connection.

use std::time::Duration;

use cv_grpc::{Auth, AuthError, AuthInterceptor, DialOptions};
use thiserror::Error;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tracing::info;

use crate::error::RedirectError;
use crate::query::AssignmentQuery;
use crate::resolver::{RedirectionResolver, Resolution};
use crate::toggle::RedirectToggle;

/// Errors from [`dial_with_auth`].
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Redirect(#[from] RedirectError),
}

/// An established connection to the resolved endpoint.
#[derive(Debug, Clone)]
pub struct Connection {
    channel: Channel,
    interceptor: AuthInterceptor,
    resolution: Resolution,
}

impl Connection {
    /// The channel wrapped with the connection's per-RPC credentials, ready
    /// to hand to a generated client's `new`.
    pub fn service(&self) -> InterceptedService<Channel, AuthInterceptor> {
        InterceptedService::new(self.channel.clone(), self.interceptor.clone())
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// The endpoint this connection is dialed to.
    pub fn endpoint(&self) -> &str {
        self.resolution.endpoint()
    }
}

/// Resolve `endpoint` and connect to the result.
pub async fn connect<Q: AssignmentQuery>(
    resolver: &RedirectionResolver<Q>,
    endpoint: &str,
    options: &DialOptions,
) -> Result<Connection, RedirectError> {
    let resolution = resolver.resolve(endpoint, options).await?;
    dial_resolved(endpoint, resolution, options).await
}

async fn dial_resolved(
    endpoint: &str,
    resolution: Resolution,
    options: &DialOptions,
) -> Result<Connection, RedirectError> {
    info!(
        %endpoint,
        resolved = %resolution.endpoint(),
        reason = %resolution.reason(),
        "connecting"
    );

    let channel = options
        .dial(resolution.endpoint())
        .await
        .map_err(|source| RedirectError::Dial {
            endpoint: resolution.endpoint().to_string(),
            source,
        })?;

    Ok(Connection {
        channel,
        interceptor: options.interceptor(),
        resolution,
    })
}

/// Dial `endpoint` with `auth`, honoring `CLOUDVISION_REGIONAL_REDIRECT`.
///
/// `timeout` bounds the assignment lookup, its `GetOne` call and each
/// connection attempt. RPCs over the returned connection are not bounded.
pub async fn dial_with_auth(
    endpoint: &str,
    auth: &Auth,
    timeout: Duration,
) -> Result<Connection, ConnectError> {
    let options = auth.configure()?.with_connect_timeout(timeout);
    let lookup = options.clone().with_request_timeout(timeout);
    let resolver = RedirectionResolver::new(RedirectToggle::from_env()).with_timeout(timeout);

    let resolution = resolver.resolve(endpoint, &lookup).await?;
    Ok(dial_resolved(endpoint, resolution, &options).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dial_with_auth_reports_unreadable_token() {
        let auth = Auth::token("/nonexistent/token.txt", None::<&str>).unwrap();

        let err = dial_with_auth("cv.example.com:443", &auth, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectError::Auth(AuthError::ReadToken(_))));
    }
}

//! Dial options: transport configuration for CloudVision connections.
//!
//! A [`DialOptions`] value carries everything needed to open a channel
//! with a given identity: TLS roots, an optional client certificate for
//! mutual TLS, the bearer token, and timeouts. The same options are used
//! for the redirection lookup and for the connection that follows it, so
//! both present the same identity to the server.

use std::fmt;
use std::time::Duration;

use tonic::transport::{Channel, ClientTlsConfig, Endpoint, Identity};
use tracing::debug;

use crate::credentials::{AccessToken, AuthInterceptor};
use crate::error::DialError;

/// Transport configuration for dialing a CloudVision endpoint.
#[derive(Clone, Default)]
pub struct DialOptions {
    tls: Option<ClientTlsConfig>,
    token: Option<AccessToken>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl DialOptions {
    /// Plaintext, unauthenticated options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use TLS with the given configuration.
    pub fn with_tls(mut self, tls: ClientTlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Use TLS verified against the host's native root store.
    pub fn with_native_tls(self) -> Self {
        self.with_tls(ClientTlsConfig::new().with_native_roots())
    }

    /// Present a client certificate (mutual TLS). Enables TLS if it was not
    /// already configured.
    pub fn with_client_identity(
        mut self,
        cert_pem: impl AsRef<[u8]>,
        key_pem: impl AsRef<[u8]>,
    ) -> Self {
        let tls = self.tls.take().unwrap_or_else(ClientTlsConfig::new);
        self.tls = Some(tls.identity(Identity::from_pem(cert_pem, key_pem)));
        self
    }

    /// Send `token` as a bearer credential on every RPC.
    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Bound the time spent establishing the connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound the duration of every request made over the channel.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Interceptor that applies these options' per-RPC credentials.
    pub fn interceptor(&self) -> AuthInterceptor {
        AuthInterceptor::new(self.token.clone())
    }

    /// Build a tonic endpoint for `target` (`host[:port]` or a full URI).
    pub fn endpoint(&self, target: &str) -> Result<Endpoint, DialError> {
        let uri = target_uri(target, self.is_tls());
        let mut endpoint =
            Endpoint::from_shared(uri).map_err(|source| DialError::InvalidEndpoint {
                target: target.to_string(),
                source,
            })?;

        if let Some(timeout) = self.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            endpoint = endpoint.timeout(timeout);
        }
        if let Some(tls) = &self.tls {
            endpoint = endpoint
                .tls_config(tls.clone())
                .map_err(|source| DialError::Tls {
                    target: target.to_string(),
                    source,
                })?;
        }

        Ok(endpoint)
    }

    /// Connect to `target`.
    pub async fn dial(&self, target: &str) -> Result<Channel, DialError> {
        let endpoint = self.endpoint(target)?;
        let channel = endpoint
            .connect()
            .await
            .map_err(|source| DialError::Connect {
                target: target.to_string(),
                source,
            })?;

        debug!(%target, tls = self.is_tls(), "channel connected");
        Ok(channel)
    }
}

impl fmt::Debug for DialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialOptions")
            .field("tls", &self.is_tls())
            .field("token", &self.token)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Endpoints are usually given as bare `host:port`; tonic wants a URI.
fn target_uri(target: &str, tls: bool) -> String {
    if target.contains("://") {
        target.to_string()
    } else if tls {
        format!("https://{target}")
    } else {
        format!("http://{target}")
    }
}

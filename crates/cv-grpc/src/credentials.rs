//! Per-RPC bearer token credentials.
//!
//! CloudVision authenticates API calls with a service account token sent
//! as `authorization: Bearer <token>` on every request. tonic has no
//! per-RPC credential type, so the token is attached by an
//! [`Interceptor`] wrapped around the channel.

use std::fmt;

use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::error::DialError;

/// Metadata key carrying the bearer token.
pub const AUTH_HEADER: &str = "authorization";

/// An access token rendered as a bearer metadata value.
#[derive(Clone)]
pub struct AccessToken {
    bearer: MetadataValue<Ascii>,
}

impl AccessToken {
    /// Build a credential from a raw token.
    pub fn new(token: &str) -> Result<Self, DialError> {
        let mut bearer: MetadataValue<Ascii> = format!("Bearer {token}")
            .parse()
            .map_err(|_| DialError::InvalidToken)?;
        bearer.set_sensitive(true);
        Ok(Self { bearer })
    }

    /// The metadata this credential adds to each request.
    pub fn request_metadata(&self) -> (&'static str, &MetadataValue<Ascii>) {
        (AUTH_HEADER, &self.bearer)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Attaches the access token, if any, to every outgoing request.
#[derive(Debug, Clone, Default)]
pub struct AuthInterceptor {
    token: Option<AccessToken>,
}

impl AuthInterceptor {
    pub fn new(token: Option<AccessToken>) -> Self {
        Self { token }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(token) = &self.token {
            let (key, value) = token.request_metadata();
            request.metadata_mut().insert(key, value.clone());
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_metadata() {
        let token = AccessToken::new("token").unwrap();
        let (key, value) = token.request_metadata();
        assert_eq!(key, "authorization");
        assert_eq!(value.to_str().unwrap(), "Bearer token");
    }

    #[test]
    fn access_token_rejects_control_characters() {
        assert!(matches!(
            AccessToken::new("tok\nen"),
            Err(DialError::InvalidToken)
        ));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("s3cret").unwrap();
        assert!(!format!("{token:?}").contains("s3cret"));
    }

    #[test]
    fn interceptor_attaches_bearer() {
        let mut interceptor = AuthInterceptor::new(Some(AccessToken::new("abc").unwrap()));
        let request = interceptor.call(Request::new(())).unwrap();
        let value = request.metadata().get(AUTH_HEADER).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn interceptor_without_token_is_passthrough() {
        let mut interceptor = AuthInterceptor::default();
        assert!(!interceptor.has_token());
        let request = interceptor.call(Request::new(())).unwrap();
        assert!(request.metadata().get(AUTH_HEADER).is_none());
    }
}

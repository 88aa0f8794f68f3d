//! cv-grpc: utilities for connecting to CloudVision's gRPC APIs.
//!
//! Provides the authentication flag (`token,{token_file}[,{ca_file}]`),
//! per-RPC bearer token credentials, and [`DialOptions`], the transport
//! configuration shared by every connection a client opens: the lookup
//! connection used for regional redirection and the connection used for
//! real traffic.

pub mod auth;
pub mod credentials;
pub mod dial;
pub mod error;

pub use auth::{Auth, AUTH_FLAG_USAGE};
pub use credentials::{AccessToken, AuthInterceptor};
pub use dial::DialOptions;
pub use error::{AuthError, DialError};

//! Error types for authentication and dialing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or dialing a gRPC endpoint.
#[derive(Debug, Error)]
pub enum DialError {
    #[error("invalid endpoint {target}: {source}")]
    InvalidEndpoint {
        target: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invalid TLS configuration for {target}: {source}")]
    Tls {
        target: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("access token is not a valid metadata value")]
    InvalidToken,
}

/// Errors produced while parsing or loading an authentication scheme.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown authentication scheme: {0}")]
    UnknownScheme(String),

    #[error("wrong number of parameters for token authentication")]
    WrongParameterCount,

    #[error("tokenFile is required")]
    MissingTokenFile,

    #[error("failed to read token file: {0}")]
    ReadToken(#[source] std::io::Error),

    #[error("token cannot be empty")]
    EmptyToken,

    #[error("failed to read ca file: {0}")]
    ReadCa(#[source] std::io::Error),

    #[error("failed to add ca file to pool: {}", .0.display())]
    InvalidCa(PathBuf),

    #[error(transparent)]
    Dial(#[from] DialError),
}

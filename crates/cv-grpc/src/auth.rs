//! Authentication schemes used to connect to CloudVision.
//!
//! The scheme is given on the command line as a single comma-separated
//! flag value; see [`AUTH_FLAG_USAGE`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tonic::transport::{Certificate, ClientTlsConfig};
use tracing::debug;

use crate::credentials::AccessToken;
use crate::dial::DialOptions;
use crate::error::AuthError;

/// Usage text for the authentication flag.
pub const AUTH_FLAG_USAGE: &str = "Authentication scheme used to connect to CloudVision. \
Possible values:\n\
\t\"token,{token_file}[,{ca_file}]\": client-side certificate with token-based \
authentication. Uses host's root CA if {ca_file} is not provided.";

/// An authentication scheme used to connect to CloudVision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Bearer token read from `token_file`. TLS roots come from `ca_file`
    /// when given, else the host's root store.
    Token {
        token_file: PathBuf,
        ca_file: Option<PathBuf>,
    },
}

impl Auth {
    /// Token authentication. `ca_file` may be empty.
    pub fn token(
        token_file: impl Into<PathBuf>,
        ca_file: Option<impl Into<PathBuf>>,
    ) -> Result<Self, AuthError> {
        let token_file = token_file.into();
        if token_file.as_os_str().is_empty() {
            return Err(AuthError::MissingTokenFile);
        }
        let ca_file = ca_file
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty());
        Ok(Auth::Token {
            token_file,
            ca_file,
        })
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Auth::Token { .. } => "token",
        }
    }

    /// The CA certificate file, if one was given.
    pub fn ca_file(&self) -> Option<&Path> {
        match self {
            Auth::Token { ca_file, .. } => ca_file.as_deref(),
        }
    }

    /// Load the per-RPC client credentials.
    pub fn client_credentials(&self) -> Result<AccessToken, AuthError> {
        match self {
            Auth::Token { token_file, .. } => {
                let raw = std::fs::read_to_string(token_file).map_err(AuthError::ReadToken)?;
                let token = raw.trim();
                if token.is_empty() {
                    return Err(AuthError::EmptyToken);
                }
                Ok(AccessToken::new(token)?)
            }
        }
    }

    /// Resolve the scheme into dial options: bearer credentials over TLS.
    pub fn configure(&self) -> Result<DialOptions, AuthError> {
        let token = self.client_credentials()?;

        let options = match self.ca_file() {
            Some(path) => {
                DialOptions::new().with_tls(ClientTlsConfig::new().ca_certificate(load_ca(path)?))
            }
            None => DialOptions::new().with_native_tls(),
        };

        debug!(scheme = self.scheme(), custom_ca = self.ca_file().is_some(), "auth configured");
        Ok(options.with_access_token(token))
    }
}

/// Read a PEM bundle and check it holds at least one certificate.
fn load_ca(path: &Path) -> Result<Certificate, AuthError> {
    let pem = std::fs::read(path).map_err(AuthError::ReadCa)?;

    let mut reader = pem.as_slice();
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AuthError::InvalidCa(path.to_path_buf()))?;
    if certs.is_empty() {
        return Err(AuthError::InvalidCa(path.to_path_buf()));
    }

    Ok(Certificate::from_pem(pem))
}

impl FromStr for Auth {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(',').collect();
        match parts[0] {
            "token" => {
                if parts.len() < 2 || parts.len() > 3 {
                    return Err(AuthError::WrongParameterCount);
                }
                Auth::token(parts[1], parts.get(2).copied())
            }
            other => Err(AuthError::UnknownScheme(other.to_string())),
        }
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token {
                token_file,
                ca_file,
            } => {
                write!(f, "token,{}", token_file.display())?;
                if let Some(ca) = ca_file {
                    write!(f, ",{}", ca.display())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn ca_pem() -> String {
        let key = rcgen::KeyPair::generate().unwrap();
        let mut params = rcgen::CertificateParams::default();
        params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
        params.self_signed(&key).unwrap().pem()
    }

    #[test]
    fn parse_auth_flag() {
        let cases: &[(&str, Result<Auth, &str>)] = &[
            ("???", Err("unknown authentication scheme: ???")),
            (
                "token,foo",
                Ok(Auth::Token {
                    token_file: "foo".into(),
                    ca_file: None,
                }),
            ),
            (
                "token,foo,ca.crt",
                Ok(Auth::Token {
                    token_file: "foo".into(),
                    ca_file: Some("ca.crt".into()),
                }),
            ),
            ("token", Err("wrong number of parameters for token authentication")),
            (
                "token,foo,ca.crt,bar",
                Err("wrong number of parameters for token authentication"),
            ),
        ];

        for (value, expected) in cases {
            let parsed = value.parse::<Auth>();
            match expected {
                Ok(auth) => {
                    let got = parsed.unwrap();
                    assert_eq!(&got, auth, "parsing {value}");
                    assert_eq!(got.to_string(), *value);
                }
                Err(msg) => assert_eq!(parsed.unwrap_err().to_string(), *msg),
            }
        }
    }

    #[test]
    fn token_requires_file() {
        let err = Auth::token("", None::<PathBuf>).unwrap_err();
        assert!(matches!(err, AuthError::MissingTokenFile));
        assert_eq!(err.to_string(), "tokenFile is required");
        assert!("token,".parse::<Auth>().is_err());
    }

    #[test]
    fn empty_ca_is_ignored() {
        let auth = Auth::token("tok", Some("")).unwrap();
        assert!(auth.ca_file().is_none());
    }

    #[test]
    fn client_credentials_trims_token() {
        let file = write_file("  secret-token\n");
        let auth = Auth::token(file.path(), None::<PathBuf>).unwrap();
        let token = auth.client_credentials().unwrap();
        assert_eq!(token.request_metadata().1.to_str().unwrap(), "Bearer secret-token");
    }

    #[test]
    fn client_credentials_rejects_empty_token() {
        let file = write_file(" \n");
        let auth = Auth::token(file.path(), None::<PathBuf>).unwrap();
        let err = auth.client_credentials().unwrap_err();
        assert_eq!(err.to_string(), "token cannot be empty");
    }

    #[test]
    fn client_credentials_missing_file() {
        let auth = Auth::token("/nonexistent/token.txt", None::<PathBuf>).unwrap();
        let err = auth.client_credentials().unwrap_err();
        assert!(err.to_string().starts_with("failed to read token file"));
    }

    #[test]
    fn configure_with_ca_file() {
        let token = write_file("tok");
        let ca = write_file(&ca_pem());
        let auth = Auth::token(token.path(), Some(ca.path())).unwrap();

        let opts = auth.configure().unwrap();
        assert!(opts.is_tls());
        assert!(opts.interceptor().has_token());
    }

    #[test]
    fn configure_rejects_bad_ca() {
        let token = write_file("tok");
        let ca = write_file("not a certificate");
        let auth = Auth::token(token.path(), Some(ca.path())).unwrap();

        let err = auth.configure().unwrap_err();
        assert!(matches!(err, AuthError::InvalidCa(_)));
        assert!(err.to_string().starts_with("failed to add ca file to pool"));
    }
}

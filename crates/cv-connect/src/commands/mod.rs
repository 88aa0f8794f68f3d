pub mod resolve;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use cv_grpc::{AUTH_FLAG_USAGE, Auth, DialOptions};

/// Flags shared by commands that talk to a CloudVision endpoint.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// CloudVision endpoint (host:port).
    #[arg(long)]
    pub server: String,

    #[arg(long, help = AUTH_FLAG_USAGE)]
    pub auth: Option<Auth>,

    /// Client certificate (PEM) for mutual TLS.
    #[arg(long, requires = "client_key")]
    pub client_cert: Option<PathBuf>,

    /// Client private key (PEM) for mutual TLS.
    #[arg(long, requires = "client_cert")]
    pub client_key: Option<PathBuf>,

    /// Connect without TLS. Ignored when --auth is given.
    #[arg(long)]
    pub plaintext: bool,

    /// Timeout in seconds for the assignment lookup, each connection and
    /// each request.
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl TargetArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Dial options for both the lookup and the final connection.
    pub fn dial_options(&self) -> anyhow::Result<DialOptions> {
        let mut options = match &self.auth {
            Some(auth) => auth
                .configure()
                .with_context(|| format!("configuring auth {auth}"))?,
            None if self.plaintext => DialOptions::new(),
            None => DialOptions::new().with_native_tls(),
        };

        if let (Some(cert), Some(key)) = (&self.client_cert, &self.client_key) {
            let cert_pem = std::fs::read(cert)
                .with_context(|| format!("reading client cert {}", cert.display()))?;
            let key_pem = std::fs::read(key)
                .with_context(|| format!("reading client key {}", key.display()))?;
            options = options.with_client_identity(cert_pem, key_pem);
        }

        Ok(options
            .with_connect_timeout(self.timeout())
            .with_request_timeout(self.timeout()))
    }
}

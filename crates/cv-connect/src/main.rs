//! cvconnect: CloudVision connection tool.
//!
//! Resolves a CloudVision endpoint through regional redirection, connects
//! to it, or serves a fixed assignment table for local development.
//!
//! # Usage
//!
//! ```text
//! cvconnect resolve --server www.arista.io:443 --auth token,token.txt
//! CLOUDVISION_REGIONAL_REDIRECT=false cvconnect connect --server cv.corp:443 --auth token,token.txt,ca.crt
//! cvconnect serve --listen 127.0.0.1:9900 --assignments assignments.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::TargetArgs;

#[derive(Parser)]
#[command(
    name = "cvconnect",
    about = "CloudVision connection tool with regional redirection",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the endpoint that connections to --server should use.
    ///
    /// Honors CLOUDVISION_REGIONAL_REDIRECT: "false" disables redirection.
    Resolve {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Resolve, then open a connection to the resolved endpoint.
    Connect {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Serve a fixed assignment table as a regional redirector.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:9900")]
        listen: SocketAddr,

        /// TOML file with the [[clusters]] to assign.
        #[arg(long)]
        assignments: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cvconnect=debug,cv_redirector=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { target, format } => commands::resolve::resolve(&target, &format).await,
        Command::Connect { target } => commands::resolve::connect(&target).await,
        Command::Serve {
            listen,
            assignments,
        } => commands::serve::serve(listen, &assignments).await,
    }
}

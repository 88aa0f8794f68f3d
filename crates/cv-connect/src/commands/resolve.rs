//! `cvconnect resolve` and `cvconnect connect`.

use anyhow::Context;
use cv_redirector::{RedirectToggle, RedirectionResolver, Resolution};
use serde::Serialize;
use tracing::info;

use super::TargetArgs;

/// Outcome of a resolution, as printed to the user.
#[derive(Debug, Serialize)]
pub struct Report {
    pub server: String,
    pub endpoint: String,
    pub redirected: bool,
    pub reason: String,
    pub toggle: String,
}

impl Report {
    pub fn new(server: &str, resolution: &Resolution, toggle: RedirectToggle) -> Self {
        Self {
            server: server.to_string(),
            endpoint: resolution.endpoint().to_string(),
            redirected: resolution.is_redirected(),
            reason: resolution.reason().to_string(),
            toggle: toggle.to_string(),
        }
    }

    pub fn render(&self, format: &str) -> anyhow::Result<String> {
        Ok(match format {
            "json" => serde_json::to_string_pretty(self)?,
            _ => format!("{} -> {} ({})", self.server, self.endpoint, self.reason),
        })
    }
}

fn resolver(target: &TargetArgs) -> RedirectionResolver {
    let toggle = RedirectToggle::from_env();
    info!(%toggle, server = %target.server, "regional redirection");
    RedirectionResolver::new(toggle).with_timeout(target.timeout())
}

pub async fn resolve(target: &TargetArgs, format: &str) -> anyhow::Result<()> {
    let options = target.dial_options()?;
    let resolver = resolver(target);

    let resolution = resolver
        .resolve(&target.server, &options)
        .await
        .with_context(|| format!("resolving {}", target.server))?;

    let report = Report::new(&target.server, &resolution, resolver.toggle());
    println!("{}", report.render(format)?);
    Ok(())
}

pub async fn connect(target: &TargetArgs) -> anyhow::Result<()> {
    let options = target.dial_options()?;
    let resolver = resolver(target);

    let conn = cv_redirector::connect(&resolver, &target.server, &options)
        .await
        .with_context(|| format!("connecting to {}", target.server))?;

    info!(endpoint = %conn.endpoint(), "connection established");
    println!("connected to {} ({})", conn.endpoint(), conn.resolution().reason());
    Ok(())
}

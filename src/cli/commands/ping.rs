use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::config;

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Server base URL (defaults to http://localhost:<configured port>)
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn handle(args: PingArgs) -> anyhow::Result<()> {
    let base_url = args
        .url
        .unwrap_or_else(|| format!("http://localhost:{}", config::config().api.port));
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let res = reqwest::get(&url)
        .await
        .with_context(|| format!("failed to reach {}", url))?;
    let status = res.status();
    let body: Value = res.json().await.context("health response was not JSON")?;

    println!("{} {}", status, body);
    if !status.is_success() {
        anyhow::bail!("server at {} is degraded", base_url);
    }
    Ok(())
}

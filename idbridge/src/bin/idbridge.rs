//! Terminal host for the identifier bridge.
//!
//! Every line on stdin is one identifier request; every generated identifier
//! is printed to stdout on its own line. End of input unmounts the bridge.
//!
//! Usage: `idbridge [config.json]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::BufReader;

use idbridge::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = BridgeConfig::load(path.as_deref())
        .with_context(|| format!("failed to load config from {path:?}"))?;
    init_tracing(&config).context("failed to install tracing subscriber")?;

    let mut app = mount(&config).context("failed to mount bridge")?;
    let stdin = BufReader::new(tokio::io::stdin());
    serve_lines(&mut app.host, stdin, tokio::io::stdout())
        .await
        .context("failed to answer requests from stdin")?;

    let served = app.unmount().await.context("bridge failed")?;
    tracing::info!(served, "Stdin closed, bridge unmounted");
    Ok(())
}

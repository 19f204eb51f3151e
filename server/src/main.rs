//! Rave Chat proxy server
//!
//! Serves `POST /api/chat` and forwards to the configured automation webhook.

use rave_proxy::ProxyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rave_core::init_logging();

    let config = ProxyConfig::from_env();
    rave_proxy::serve(config).await?;

    Ok(())
}

//! Hotseat Server - Binary Entry Point
//!
//! This is the main entry point for the hotseat-server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use hotseat::config::{ServerConfig, DEFAULT_ALLOWED_ORIGIN, DEFAULT_HUB_CAPACITY};
use hotseat::server;
use hotseat::types::HotseatResult;
use hotseat::utils::{init_logging, DEFAULT_LOG_FILTER};

/// Real-time posting board server
#[derive(Debug, Parser)]
#[command(name = "hotseat-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "HOTSEAT_BIND", default_value = "127.0.0.1:7071")]
    bind: SocketAddr,

    /// Directory for events.jsonl
    #[arg(long, env = "HOTSEAT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Origin allowed by CORS
    #[arg(long, env = "HOTSEAT_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    origin: String,

    /// Hub URL handed out by negotiate (default: derived from the request Host)
    #[arg(long, env = "HOTSEAT_HUB_URL")]
    hub_url: Option<String>,

    /// Frames buffered per hub session before it lags
    #[arg(long, env = "HOTSEAT_HUB_CAPACITY", default_value_t = DEFAULT_HUB_CAPACITY)]
    hub_capacity: usize,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::new(self.data_dir)
            .with_bind_addr(self.bind)
            .with_allowed_origin(self.origin)
            .with_hub_capacity(self.hub_capacity);
        if let Some(url) = self.hub_url {
            config = config.with_public_hub_url(url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> HotseatResult<()> {
    init_logging(DEFAULT_LOG_FILTER);

    let config = Args::parse().into_config();
    let handle = server::start(config).await?;

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");

    handle.shutdown().await?;
    Ok(())
}

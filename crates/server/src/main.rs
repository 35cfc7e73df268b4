//! sitemeta server entry point.
//!
//! Boots the metadata inventory server on stdio transport. Logging goes
//! to stderr to avoid interfering with the JSON-RPC protocol on stdout.
//! Startup fails when required configuration is missing or the metadata
//! store cannot be reached.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod handler;
mod service;
mod tools;

use sitemeta_client::{FetchClient, FetchConfig};
use sitemeta_core::{AppConfig, MetadataStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting sitemeta server on stdio transport");

    let store = MetadataStore::open(&config.db_path).await?;
    store.ping().await?;
    tracing::info!(db_path = %config.db_path.display(), "connected to metadata store");

    let fetcher = FetchClient::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_body_bytes: config.max_body_bytes,
        timeout: config.timeout(),
        max_redirects: config.max_redirects,
    })?;

    let service = service::MetadataService::new(store, Arc::new(fetcher));
    let handler = handler::SiteMetaServer::new(service);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

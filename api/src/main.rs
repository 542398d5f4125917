pub mod config;
pub mod error;
pub mod pipelines;
pub mod routes;
pub mod service;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use tokio::time::sleep;

use crate::config::{ApiConfig, StoreKind};
use crate::pipelines::KeyDbPlayerStore;
use crate::service::PlayerService;
use crate::store::{MemoryPlayerStore, PlayerStore};

async fn connect_keydb_with_retry(
    keydb_url: &str,
) -> anyhow::Result<redis::aio::MultiplexedConnection> {
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY_SECS: u64 = 6;

    let client = redis::Client::open(keydb_url)
        .with_context(|| format!("Invalid KeyDB url {}", keydb_url))?;

    let mut attempt = 0;
    loop {
        match client.get_multiplexed_async_connection().await {
            Ok(con) => return Ok(con),
            Err(err) if attempt < MAX_RETRIES => {
                attempt += 1;
                warn!(
                    "Failed to connect to KeyDB (attempt {}/{}): {}; retrying in {}s",
                    attempt,
                    MAX_RETRIES + 1,
                    err,
                    RETRY_DELAY_SECS
                );
                sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
            }
            Err(err) => return Err(err).context("Failed to connect to KeyDB"),
        }
    }
}

async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn PlayerStore>> {
    match config.store {
        StoreKind::KeyDb => {
            let con = connect_keydb_with_retry(&config.keydb_url).await?;
            info!("Connected to KeyDB");
            Ok(Arc::new(KeyDbPlayerStore::new(con)))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory player store; data is lost on shutdown");
            Ok(Arc::new(MemoryPlayerStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment is used as-is.
    let _ = dotenvy::dotenv();

    let config = ApiConfig::from_env();
    roster_core::initialize_logger(config.log_level, config.log_file.as_deref())?;

    info!(
        "API starting (level={}, logfile={}, store={:?})",
        config.log_level,
        config.log_file.as_deref().unwrap_or("none"),
        config.store
    );

    let store = open_store(&config).await?;
    let app = routes::router(Arc::new(PlayerService::new(store)));

    let bind_address = config.bind_address();
    info!("Listening on {}", bind_address);

    match (&config.tls_cert, &config.tls_key) {
        (Some(cert_path), Some(key_path)) => {
            info!("HTTPS enabled (cert={}, key={})", cert_path, key_path);
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls_config =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path)
                    .await
                    .context("Failed to load TLS cert/key")?;
            let addr: SocketAddr = bind_address
                .parse()
                .with_context(|| format!("Invalid bind address {}", bind_address))?;
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            warn!("API is running WITHOUT TLS; set API_TLS_CERT and API_TLS_KEY to enable HTTPS");
            let listener = tokio::net::TcpListener::bind(&bind_address).await?;
            axum::serve(listener, app).await?;
        }
    }

    info!("Server shutdown");
    Ok(())
}

use actix_web::web;
use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use genediff_api::app::{load_catalog, server, AppData, Config};

#[actix_web::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv() {
        debug!(error = %e, "no .env file loaded");
    }
    let config = Config::from_env()
        .context("failed to read Config from environment")?;

    let data = web::Data::new(AppData::new(config.sources()));
    let server = server(data.clone(), &config.bind_address, config.max_payload_bytes)
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %config.bind_address, "listening, catalog is loading");

    // Requests are answered with 503 until the first catalog is published.
    // If it cannot be loaded at all the server is shut down again.
    let handle = server.handle();
    let startup = actix_web::rt::spawn(async move {
        let result = load_catalog(data).await;
        if result.is_err() {
            handle.stop(false).await;
        }
        result
    });

    server.await?;
    startup.await?
        .context("failed to load reference catalog")?;
    Ok(())
}

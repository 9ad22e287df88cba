use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tus_libros_server::{Bookstore, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().inspect_err(|e| error!(error = %e, "invalid configuration"))?;
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        books = config.catalogue.len(),
        clients = config.clients.len(),
        cart_ttl_minutes = config.cart_ttl_minutes,
        "listening"
    );
    tus_libros_server::run(listener, Bookstore::from_config(&config)).await?;
    Ok(())
}

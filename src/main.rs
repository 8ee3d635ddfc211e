use std::sync::Arc;
use taxi_dispatch_proxy::bookings::AppState;
use taxi_dispatch_proxy::config::Config;
use taxi_dispatch_proxy::upstream::SupplierClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxi_dispatch_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!("Starting taxi dispatch proxy");
    info!("Supplier endpoint: {}", config.end_point);

    let supplier = SupplierClient::new(&config)?;
    let state = Arc::new(AppState { supplier });
    let app = taxi_dispatch_proxy::app(state);

    let bind_addr = format!("{}:{}", config.bind_address, config.port);
    info!("Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Merchant Dashboard - Web Server
// REST API with Axum over an in-memory transaction snapshot

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use merchant_dashboard::api::{router, AppState};
use merchant_dashboard::{logging, DashboardConfig, TransactionRepository};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = DashboardConfig::from_env()?;
    logging::init_tracing(&config.log_level)?;

    info!("Merchant Dashboard - Web Server v{}", merchant_dashboard::VERSION);

    let repository = TransactionRepository::load_with(&config.data_path, config.load_options())
        .with_context(|| {
            format!(
                "Could not load transactions from {:?}. Generate sample data with: \
                 merchant-dashboard generate {}",
                config.data_path,
                config.data_path.display()
            )
        })?;

    let static_dir = config.static_dir.as_deref().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            warn!(dir = %dir.display(), "Static directory not found, serving API only");
        }
        exists
    });

    let state = AppState::new(Arc::new(repository));
    let app = router(state, static_dir);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("API: http://{}/api/summary", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

//! docbridge server
//!
//! HTTP gateway that forwards JSON requests to one MongoDB database.

use clap::Parser;
use docbridge_server::{logging, router, AppState, Args, ServerConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = match ServerConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.log_level, config.json_logs);

    let state = AppState::from_config(config.clone());
    let manager = state.connection().clone();

    // Warm the connection without delaying the listener; failures are retried
    // on the first request.
    let warmup = manager.clone();
    tokio::spawn(async move {
        if let Err(e) = warmup.ensure_connected().await {
            warn!(error = %e, "Initial MongoDB connection failed");
        }
    });

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        addr = %bind_addr,
        database = %config.connection.database,
        uri = %config.connection.masked_uri(),
        "docbridge listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Closing MongoDB connection");
    manager.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

//! Drive relay server binary.
//!
//! Loads configuration from the command line, the environment and an
//! optional `.env` file, builds the Drive client and either listens for
//! requests or, in hosted mode, leaves serving to the external host.

use axum_server::Handle;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use drive_relay::app::build_router;
use drive_relay::config::{Args, MAX_FILE_SIZE, SHUTDOWN_GRACE_SECS};
use drive_relay::drive::{DriveClient, DriveStore, TokenSource};
use drive_relay::http::build_cors_layer;
use drive_relay::logging;
use drive_relay::transfer::TransferConfig;

/// Starts the relay and blocks until shutdown.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let args = Args::parse();
    let tokens = TokenSource::with_token_url(&args.token_url, args.credentials())
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;
    let drive: Arc<dyn DriveStore> = Arc::new(
        DriveClient::with_base_url(&args.drive_api_url, tokens).map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
        })?,
    );
    let transfer_config = Arc::new(TransferConfig {
        root_folder_id: args.root_folder_id.clone(),
        max_file_size: MAX_FILE_SIZE,
    });
    let app = build_router(drive, transfer_config, build_cors_layer(&args.cors_origins));

    if args.hosted {
        info!("hosted mode: request handling is left to the external host");
        return Ok(());
    }

    let host = args
        .host
        .parse::<IpAddr>()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;
    let addr = SocketAddr::new(host, args.port);
    let handle = Handle::new();

    info!("Server running on port {}", args.port);
    let server = axum_server::bind(addr)
        .handle(handle.clone())
        .serve(app.into_make_service_with_connect_info::<SocketAddr>());

    tokio::select! {
        result = server => result?,
        _ = shutdown_signal(handle) => {}
    }

    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_SECS)));
}

use tokio::net::TcpListener;
use tracing::{error, info};
use s3_gateway::{config::Config, routes::create_router, utils::init_logger, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded: {:?}", config);

    let bind_on = config.server.bind_address();
    let listener = match TcpListener::bind((config.server.bind.as_str(), config.server.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind '{}': {}", bind_on, e);
            std::process::exit(1);
        }
    };

    // Create shared state and router
    let app = create_router(AppState::new(config));

    info!("Starting server on: '{}'", bind_on);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

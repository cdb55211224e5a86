//! PhishGuard Server
//!
//! Serves phishing classification scores for precomputed URL feature vectors.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{info, warn};

use phishguard_server::{create_router, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting PhishGuard server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Model path: {}", config.model_path.display());

    let metrics_handle = init_metrics()?;

    // A missing or broken model does not stop the server
    let state = AppState::from_config(&config).with_metrics(metrics_handle);
    if state.model_loaded() {
        info!("Model ready for predictions");
    }

    let addr = config.bind_addr()?;
    let app = create_router(state, &config.cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("phishguard=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("phishguard=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "phishguard_requests_total",
        "Total number of classification requests by endpoint"
    );
    metrics::describe_counter!(
        "phishguard_predictions_total",
        "Total number of predictions by class"
    );
    metrics::describe_counter!("phishguard_errors_total", "Total number of errors by kind");
    metrics::describe_histogram!(
        "phishguard_inference_latency_us",
        metrics::Unit::Microseconds,
        "Inference latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use figures_api::config::{LogFormat, ServerConfig};
use figures_api::router::build_app_router;
use figures_api::state::AppState;
use figures_pipeline::{DocumentUploader, PipelineConfig, SubmissionPipeline};
use figures_storage::StorageConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    // Loaded before tracing so LOG_FORMAT can pick the output layer.
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "figures_api=debug,figures_pipeline=debug,tower_http=debug".into()
    });

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let pipeline_config = PipelineConfig::from_env();
    tracing::info!(
        recipient = %pipeline_config.notify_recipient,
        notify_timeout_secs = pipeline_config.notify_timeout.as_secs(),
        upload_timeout_secs = pipeline_config.upload_timeout.as_secs(),
        "Loaded pipeline configuration",
    );

    // --- Notifier ---
    let notifier = figures_events::delivery::from_env();
    match &notifier {
        Some(n) => tracing::info!(channel = n.channel(), "Reviewer notifier configured"),
        None => tracing::warn!(
            "No notifier configured (set MAIL_API_KEY or SMTP_HOST); submissions will not be dispatched"
        ),
    }

    // --- Document storage ---
    let storage = StorageConfig::from_env();
    match &storage {
        Some(s @ StorageConfig::Local { .. }) if config.document_mount.is_none() => tracing::warn!(
            storage = ?s,
            "Local document storage has no path in DOCUMENT_BASE_URL; stored documents will not be served",
        ),
        Some(s) => tracing::info!(storage = ?s, "Document storage configured"),
        None => tracing::warn!(
            hint = figures_storage::config::UNCONFIGURED_HINT,
            "No document storage configured; uploads will be refused",
        ),
    }
    let uploader = DocumentUploader::new(
        storage.map(StorageConfig::build),
        pipeline_config.upload_timeout,
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        pipeline: Arc::new(SubmissionPipeline::with_denylist(notifier, pipeline_config)),
        uploader: Arc::new(uploader),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = signal_rx.await;
            })
            .await
    });

    shutdown_signal().await;
    let _ = signal_tx.send(());

    // --- Drain in-flight requests ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Graceful shutdown complete"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_elapsed) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "In-flight requests did not drain in time, exiting"
        ),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

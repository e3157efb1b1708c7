use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use spark_pipeline::SimulatedExecutor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spark_api::auth::bootstrap::ensure_admin;
use spark_api::config::ServerConfig;
use spark_api::engine::JobEngine;
use spark_api::router::build_app_router;
use spark_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spark_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        upload_dir = %config.upload_dir.display(),
        step_delay_total_ms = config.step_delays.total().as_millis() as u64,
        "Loaded server configuration",
    );

    // --- Storage ---
    let pool = spark_db::create_pool();
    if let Some(admin) = &config.admin {
        ensure_admin(&pool, admin)
            .await
            .expect("Failed to bootstrap admin account");
    }
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Job engine ---
    let executor = Arc::new(SimulatedExecutor::new(
        config.upload_dir.clone(),
        config.step_delays,
    ));
    let engine = JobEngine::new(pool.clone(), executor);
    tracing::info!("Job engine started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine: Arc::clone(&engine),
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

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, stopping job drivers");

    let timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if engine.shutdown(timeout).await {
        tracing::info!("Job engine stopped");
    } else {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Job drivers still running at shutdown timeout",
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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

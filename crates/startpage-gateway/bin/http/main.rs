mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use startpage_core::CardRepository;
use startpage_dashboard::DashboardService;
use startpage_gateway::{App, AppState, RequestToken};
use startpage_storage::{InMemoryCardRepository, SqliteCardRepository};
use startpage_telemetry::TelemetryConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = startpage_telemetry::init(
        TelemetryConfig::builder()
            .service_name("startpage")
            .format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    let request_token = match config.request_token {
        Some(ref token) => RequestToken::new(token.as_str()),
        None => RequestToken::generate(),
    };

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting startpage HTTP server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(config.listen_addr, InMemoryCardRepository::new(), request_token).await?;
        }
        StorageBackendArg::Sqlite => {
            let repository = SqliteCardRepository::open(&config.sqlite_path)
                .await
                .with_context(|| {
                    format!("failed to open database at {}", config.sqlite_path.display())
                })?;
            let pool = repository.pool().clone();
            run_server(config.listen_addr, repository, request_token).await?;
            pool.close().await;
        }
    }

    info!("startpage HTTP server stopped");
    Ok(())
}

async fn run_server<R: CardRepository>(
    listen_addr: SocketAddr,
    repository: R,
    request_token: RequestToken,
) -> anyhow::Result<()> {
    let dashboard = DashboardService::new(repository);
    let state = AppState::new(Arc::new(dashboard), request_token);

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}

//! Geovision Engine - Main entry point.

use std::sync::Arc;

use geovision_engine::api::{grpc, http};
use geovision_engine::config::Config;
use geovision_engine::infrastructure::arango::{ensure_schema, ArangoStore};
use geovision_engine::App;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Spawns a task that cancels `cancel_token` on SIGTERM/SIGINT.
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel_token.cancel();
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geovision_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Geovision Engine");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Connect to ArangoDB and make sure the fixed collections exist
    let store = ArangoStore::connect(&config.arango).await?;
    ensure_schema(&store, &config.graph_name).await?;

    let app = Arc::new(App::new(
        Arc::new(store),
        &config.graph_name,
        config.window_policy,
    ));

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let grpc_server = {
        let (app, addr, cancel_token) = (app.clone(), config.grpc_addr(), cancel_token.clone());
        async move {
            grpc::serve(app, addr, async move {
                cancel_token.cancelled().await;
                tracing::info!("gRPC server received shutdown signal");
            })
            .await
            .map_err(anyhow::Error::from)
        }
    };
    let http_server = {
        let (addr, cors) = (config.http_addr(), config.cors_allowed_origins.as_deref());
        async move {
            http::serve(app, addr, cors, async move {
                cancel_token.cancelled().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await
            .map_err(anyhow::Error::from)
        }
    };

    // A listener that fails takes the other one down with it
    tokio::try_join!(grpc_server, http_server)?;

    tracing::info!("Geovision Engine shutdown complete");
    Ok(())
}

use std::sync::Arc;

use tokio::{select, signal::unix::SignalKind};
use tokio_util::sync::CancellationToken;

use super::{RuntimeDeps, shutdown};
use crate::{error::NodeError, periodic_tasks};

/// Runs every long-lived task until SIGINT or SIGTERM, then shuts them down in order.
pub(crate) async fn run(deps: RuntimeDeps) -> Result<(), NodeError> {
    let RuntimeDeps {
        periodic_tasks_deps,
        chain_events_config,
        validator_engine,
        http_router,
    } = deps;

    // Install before spawning so a failure leaves nothing running.
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;

    // Create HTTP shutdown channel (oneshot for single signal)
    let (http_shutdown_tx, http_shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let periodic_shutdown = CancellationToken::new();
    let periodic_handle = tokio::task::spawn(periodic_tasks::run(
        Arc::clone(&periodic_tasks_deps),
        chain_events_config,
        periodic_shutdown.clone(),
    ));

    let validator = validator_engine.spawn();

    // Spawn HTTP API task if enabled
    let handle_http_events_task = tokio::task::spawn(async move {
        if let Some(router) = http_router {
            router
                .listen_and_handle_http_requests(http_shutdown_rx)
                .await;
        } else {
            // HTTP API disabled - wait for shutdown signal
            let _ = http_shutdown_rx.await;
        }
    });

    select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Received SIGINT, initiating shutdown..."),
            Err(error) => tracing::error!(error = %error, "Failed to listen for SIGINT, shutting down"),
        },
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        periodic_handle,
        validator,
        http_shutdown_tx,
        handle_http_events_task,
    })
    .await;

    Ok(())
}

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::validator::RunningValidator;

const PERIODIC_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const HTTP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) struct ShutdownContext {
    pub(super) periodic_shutdown: CancellationToken,
    pub(super) periodic_handle: JoinHandle<()>,
    pub(super) validator: RunningValidator,
    pub(super) http_shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub(super) handle_http_events_task: JoinHandle<()>,
}

pub(super) async fn graceful_shutdown(context: ShutdownContext) {
    // Ordered shutdown:
    // 1. Stop HTTP server from accepting new requests
    // 2. Cancel the chain event ingestor and the validator engine together
    // 3. Wait for the ingestor, aborting it after a timeout
    // 4. Wait for the engine without a deadline; a settlement in progress finishes
    // 5. Wait for HTTP to finish in-flight requests
    let ShutdownContext {
        periodic_shutdown,
        mut periodic_handle,
        validator,
        http_shutdown_tx,
        mut handle_http_events_task,
    } = context;

    tracing::info!("Shutting down gracefully...");

    let _ = http_shutdown_tx.send(());

    periodic_shutdown.cancel();
    validator.cancel();

    wait_for_shutdown_task(
        "periodic_tasks",
        PERIODIC_SHUTDOWN_TIMEOUT,
        &mut periodic_handle,
        true,
    )
    .await;

    validator.stop().await;

    wait_for_shutdown_task(
        "http_server",
        HTTP_SHUTDOWN_TIMEOUT,
        &mut handle_http_events_task,
        false,
    )
    .await;

    tracing::info!("Shutdown complete");
}

async fn wait_for_shutdown_task(
    task: &str,
    timeout: Duration,
    handle: &mut JoinHandle<()>,
    abort_on_timeout: bool,
) {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(
            task,
            error = ?error,
            "Shutdown task panicked"
        ),
        Err(_) if abort_on_timeout => {
            tracing::warn!(
                task,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout reached, aborting task"
            );
            handle.abort();
            let _ = handle.await;
        }
        Err(_) => tracing::warn!(
            task,
            timeout_secs = timeout.as_secs(),
            "Shutdown timeout reached"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    fn finished_task() -> JoinHandle<()> {
        tokio::spawn(async {})
    }

    #[tokio::test(start_paused = true)]
    async fn engine_finishing_a_settlement_is_never_aborted() {
        let settled = Arc::new(AtomicBool::new(false));
        let engine_shutdown = CancellationToken::new();
        let engine = tokio::spawn({
            let settled = Arc::clone(&settled);
            let engine_shutdown = engine_shutdown.clone();
            async move {
                engine_shutdown.cancelled().await;
                // A settlement far slower than any shutdown timeout.
                tokio::time::sleep(Duration::from_secs(120)).await;
                settled.store(true, Ordering::SeqCst);
            }
        });
        let (http_shutdown_tx, _http_shutdown_rx) = tokio::sync::oneshot::channel();

        graceful_shutdown(ShutdownContext {
            periodic_shutdown: CancellationToken::new(),
            periodic_handle: finished_task(),
            validator: RunningValidator::from_parts(engine_shutdown, engine),
            http_shutdown_tx,
            handle_http_events_task: finished_task(),
        })
        .await;

        assert!(settled.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn engine_is_cancelled_without_waiting_for_the_ingestor() {
        let periodic_shutdown = CancellationToken::new();
        // Ingestor that ignores cancellation until aborted.
        let periodic_handle = tokio::spawn(std::future::pending::<()>());
        let engine_shutdown = CancellationToken::new();
        let cancelled_at = Arc::new(std::sync::Mutex::new(None));
        let engine = tokio::spawn({
            let cancelled_at = Arc::clone(&cancelled_at);
            let engine_shutdown = engine_shutdown.clone();
            async move {
                engine_shutdown.cancelled().await;
                *cancelled_at.lock().unwrap() = Some(tokio::time::Instant::now());
            }
        });
        let (http_shutdown_tx, _http_shutdown_rx) = tokio::sync::oneshot::channel();
        let started = tokio::time::Instant::now();

        graceful_shutdown(ShutdownContext {
            periodic_shutdown,
            periodic_handle,
            validator: RunningValidator::from_parts(engine_shutdown, engine),
            http_shutdown_tx,
            handle_http_events_task: finished_task(),
        })
        .await;

        let cancelled_at = cancelled_at.lock().unwrap().expect("engine observed cancel");
        assert!(cancelled_at.duration_since(started) < PERIODIC_SHUTDOWN_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_task_returns_immediately() {
        let mut handle = tokio::spawn(async {});
        wait_for_shutdown_task("noop", Duration::from_secs(1), &mut handle, true).await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_task_is_aborted_after_timeout() {
        let mut handle = tokio::spawn(std::future::pending::<()>());
        wait_for_shutdown_task("stuck", Duration::from_secs(1), &mut handle, true).await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_task_is_left_running_without_abort() {
        let mut handle = tokio::spawn(std::future::pending::<()>());
        wait_for_shutdown_task("stuck", Duration::from_secs(1), &mut handle, false).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}

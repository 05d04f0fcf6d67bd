//! Generic at-least-once consumer loop shared by the Runner, Judge, and
//! Curator queues (spec §5: one message in flight per worker, parallel
//! workers across a concurrency cap).
//!
//! A handler that returns `Ok` acks the message. A handler error that
//! [`OrchestratorError::is_terminal_for_run`] classifies as terminal
//! (unknown model, scenario not found) also acks -- the handler itself
//! already persisted the run's `failed` state, so there is nothing left
//! for redelivery to retry (spec §7). Any other error leaves the message
//! unacked; it becomes visible again after its queue's visibility timeout
//! and is redelivered, up to the configured redrive count before the
//! queue itself dead-letters it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{error, warn};

use socratic_bench_orchestrator::OrchestratorError;
use socratic_bench_queue::JobQueue;

/// How long an idle worker sleeps before polling an empty queue again.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Run `concurrency` independent consumer loops against `queue_name` until
/// the process exits. `process` is cloned (as an `Arc`) across loops, so
/// it must be `Send + Sync`.
pub fn spawn_consumers<T, H, Fut>(
    queue: JobQueue,
    queue_name: &'static str,
    visibility_timeout_secs: i64,
    max_redeliveries: i32,
    concurrency: usize,
    handler: Arc<H>,
    process: impl Fn(Arc<H>, T) -> Fut + Send + Sync + Copy + 'static,
) where
    T: DeserializeOwned + Send + 'static,
    H: Send + Sync + 'static,
    Fut: Future<Output = Result<(), OrchestratorError>> + Send,
{
    for worker_index in 0..concurrency {
        let queue = queue.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            loop {
                match queue.claim::<T>(queue_name, visibility_timeout_secs).await {
                    Ok(Some(message)) => {
                        let result = process(handler.clone(), message.payload).await;
                        match result {
                            Ok(()) => {
                                if let Err(err) = queue.ack(message.id).await {
                                    error!(queue_name, worker_index, error = %err, "failed to ack processed message");
                                }
                            }
                            Err(err) if err.is_terminal_for_run() => {
                                warn!(
                                    queue_name,
                                    worker_index,
                                    delivery_count = message.delivery_count,
                                    error = %err,
                                    "terminal error, acking message"
                                );
                                if let Err(ack_err) = queue.ack(message.id).await {
                                    error!(queue_name, worker_index, error = %ack_err, "failed to ack terminal-error message");
                                }
                            }
                            Err(err) => {
                                warn!(
                                    queue_name,
                                    worker_index,
                                    delivery_count = message.delivery_count,
                                    max_redeliveries,
                                    error = %err,
                                    "transient error, leaving message for redelivery"
                                );
                            }
                        }
                    }
                    Ok(None) => tokio::time::sleep(IDLE_POLL).await,
                    Err(err) => {
                        error!(queue_name, worker_index, error = %err, "failed to claim message");
                        tokio::time::sleep(IDLE_POLL).await;
                    }
                }
            }
        });
    }
}

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_blockchain_rpc_retry(operation: &str) {
    counter!(
        "grid_blockchain_rpc_retries_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}

pub fn record_blockchain_event_logs_batch(
    status: &str,
    duration: Duration,
    block_span: usize,
    logs: usize,
) {
    counter!(
        "grid_blockchain_event_logs_batch_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "grid_blockchain_event_logs_batch_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "grid_blockchain_event_logs_batch_blocks",
        "status" => status.to_string()
    )
    .record(block_span as f64);
    histogram!(
        "grid_blockchain_event_logs_batch_events",
        "status" => status.to_string()
    )
    .record(logs as f64);
}

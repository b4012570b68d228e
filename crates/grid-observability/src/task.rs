use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_chain_event_ingestor_cycle(
    status: &str,
    duration: Duration,
    fetched_events: usize,
    processed_events: usize,
    skipped_events: usize,
) {
    counter!(
        "grid_chain_event_ingestor_cycle_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "grid_chain_event_ingestor_cycle_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    histogram!(
        "grid_chain_event_ingestor_fetched_events",
        "status" => status.to_string()
    )
    .record(fetched_events as f64);
    histogram!(
        "grid_chain_event_ingestor_processed_events",
        "status" => status.to_string()
    )
    .record(processed_events as f64);
    histogram!(
        "grid_chain_event_ingestor_skipped_events",
        "status" => status.to_string()
    )
    .record(skipped_events as f64);
}

pub fn record_chain_event_applied(event: &str, outcome: &str) {
    counter!(
        "grid_chain_event_applied_total",
        "event" => event.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_ingestion_checkpoint(next_block: u64) {
    gauge!("grid_ingestion_checkpoint_block").set(next_block as f64);
}

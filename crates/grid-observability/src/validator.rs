use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_validator_stage(stage: &str, status: &str, duration: Duration) {
    counter!(
        "grid_validator_stage_total",
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "grid_validator_stage_duration_seconds",
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_proof_submission(outcome: &str) {
    counter!(
        "grid_validator_proof_submissions_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_challenge_round(round: u64, challenged_nodes: usize) {
    gauge!("grid_validator_challenge_round").set(round as f64);
    gauge!("grid_validator_challenged_nodes").set(challenged_nodes as f64);
}

pub fn record_settlement_outcome(outcome: &str) {
    counter!(
        "grid_validator_settlements_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_discarded_proofs(reason: &str, count: usize) {
    counter!(
        "grid_validator_discarded_proofs_total",
        "reason" => reason.to_string()
    )
    .increment(count as u64);
}

use std::time::{Duration, Instant};

use metrics::{counter, histogram};

pub(crate) fn record_repository_query(
    repository: &str,
    method: &str,
    status: &str,
    duration: Duration,
    rows: Option<usize>,
) {
    counter!(
        "grid_repository_query_total",
        "repository" => repository.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "grid_repository_query_duration_seconds",
        "repository" => repository.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    if let Some(rows) = rows {
        histogram!(
            "grid_repository_query_rows",
            "repository" => repository.to_string(),
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .record(rows as f64);
    }
}

/// Records `result` as one query; `rows` counts the rows a success touched.
pub(crate) fn record_query_result<T, E>(
    repository: &str,
    method: &str,
    started: Instant,
    result: &Result<T, E>,
    rows: impl FnOnce(&T) -> usize,
) {
    match result {
        Ok(value) => record_repository_query(
            repository,
            method,
            "ok",
            started.elapsed(),
            Some(rows(value)),
        ),
        Err(_) => record_repository_query(repository, method, "error", started.elapsed(), None),
    }
}

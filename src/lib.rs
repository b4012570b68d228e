mod bootstrap;
mod config;
mod controllers;
mod error;
mod ledger;
mod logger;
mod periodic_tasks;
pub mod prover_client;
mod runtime;
mod validator;

use std::{process::ExitCode, sync::Arc};

use crate::{error::NodeError, validator::ValidatorEngine};

/// Runs the validator node until SIGINT or SIGTERM.
pub async fn run() -> ExitCode {
    match try_run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // The subscriber is not installed yet when configuration fails.
            tracing::error!(error = %error, "Validator node failed");
            eprintln!("grid-validator: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn try_run() -> Result<(), NodeError> {
    let core = bootstrap::build_core().await?;

    display_grid_validator_banner(&core);

    let (validator_engine, validator_handle) = ValidatorEngine::new(
        &core.config.validator,
        core.ledger.clone(),
        Arc::clone(&core.clock),
    );
    let periodic_tasks_deps = bootstrap::build_periodic_tasks_deps(&core);
    let controllers = bootstrap::build_controllers(&core, validator_handle);

    runtime::run(runtime::RuntimeDeps {
        periodic_tasks_deps,
        chain_events_config: core.config.chain_events.clone(),
        validator_engine,
        http_router: controllers.http_router,
    })
    .await
}

fn display_grid_validator_banner(core: &bootstrap::CoreBootstrap) {
    let timing = &core.config.validator.timing;
    tracing::info!("======================================================");
    tracing::info!("             Grid Validator v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("======================================================");
    tracing::info!(
        cycle_secs = timing.cycle_secs(),
        difficulty_bits = core.config.validator.difficulty_bits,
        "Validator cycle configured"
    );
}

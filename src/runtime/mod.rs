mod runner;
mod shutdown;

use std::sync::Arc;

use crate::{
    controllers::HttpApiRouter,
    periodic_tasks::{self, ChainEventsConfig},
    validator::ValidatorEngine,
};

pub(crate) struct RuntimeDeps {
    pub(crate) periodic_tasks_deps: Arc<periodic_tasks::PeriodicTasksDeps>,
    pub(crate) chain_events_config: ChainEventsConfig,
    pub(crate) validator_engine: ValidatorEngine,
    pub(crate) http_router: Option<HttpApiRouter>,
}

pub(crate) use runner::run;

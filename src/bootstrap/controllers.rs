use std::sync::Arc;

use crate::{
    bootstrap::CoreBootstrap,
    controllers::{self, http_api_controller::HttpApiDeps},
    validator::ValidatorHandle,
};

pub(crate) fn build_controllers(
    core: &CoreBootstrap,
    validator: ValidatorHandle,
) -> controllers::Controllers {
    controllers::initialize(
        &core.config.http_api,
        HttpApiDeps {
            validator,
            ledger: core.ledger.clone(),
            signer: Arc::new(core.config.validator.signer.clone()),
        },
    )
}

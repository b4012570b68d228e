use std::sync::Arc;

use axum::extract::FromRef;
use grid_blockchain::PrivateKeySigner;

use crate::{ledger::ProfitLedger, validator::ValidatorHandle};

#[derive(Clone)]
pub(crate) struct HttpApiDeps {
    pub(crate) validator: ValidatorHandle,
    pub(crate) ledger: ProfitLedger,
    pub(crate) signer: Arc<PrivateKeySigner>,
}

#[derive(Clone)]
pub(crate) struct ValidatorHttpApiControllerDeps {
    pub(crate) validator: ValidatorHandle,
}

impl FromRef<HttpApiDeps> for ValidatorHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            validator: input.validator.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct WithdrawSignatureHttpApiControllerDeps {
    pub(crate) ledger: ProfitLedger,
    pub(crate) signer: Arc<PrivateKeySigner>,
}

impl FromRef<HttpApiDeps> for WithdrawSignatureHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            ledger: input.ledger.clone(),
            signer: Arc::clone(&input.signer),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ProfitHttpApiControllerDeps {
    pub(crate) ledger: ProfitLedger,
}

impl FromRef<HttpApiDeps> for ProfitHttpApiControllerDeps {
    fn from_ref(input: &HttpApiDeps) -> Self {
        Self {
            ledger: input.ledger.clone(),
        }
    }
}

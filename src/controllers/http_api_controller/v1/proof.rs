use axum::{Json, extract::State, extract::rejection::JsonRejection};
use grid_domain::{NodeIdentity, Proof};

use crate::controllers::http_api_controller::{
    ValidatorHttpApiControllerDeps,
    api_error::ApiError,
    v1::{dto::proof::ProofRequest, parse_address},
};

pub(crate) struct ProofHttpApiController;

impl ProofHttpApiController {
    pub(crate) async fn handle_request(
        State(deps): State<ValidatorHttpApiControllerDeps>,
        request: Result<Json<ProofRequest>, JsonRejection>,
    ) -> Result<Json<&'static str>, ApiError> {
        let Json(request) = request?;
        let address = parse_address("address", Some(&request.address))?;
        let proof = Proof::new(NodeIdentity::new(address, request.id), request.nonce);

        if let Err(error) = deps.validator.submit_proof(proof).await {
            tracing::warn!(
                identity = %proof.identity,
                nonce = proof.nonce,
                error = %error,
                "Proof rejected"
            );
            return Err(error.into());
        }

        tracing::debug!(identity = %proof.identity, "Proof accepted");
        Ok(Json("Verify Proof Success"))
    }
}

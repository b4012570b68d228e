use axum::{Json, extract::State};

use crate::controllers::http_api_controller::{
    ValidatorHttpApiControllerDeps, v1::dto::challenge::ChallengeResponse,
};

pub(crate) struct ChallengeHttpApiController;

impl ChallengeHttpApiController {
    pub(crate) async fn handle_request(
        State(deps): State<ValidatorHttpApiControllerDeps>,
    ) -> Json<ChallengeResponse> {
        let snapshot = deps.validator.challenge();
        Json(ChallengeResponse::new(snapshot.challenge.to_hex()))
    }
}

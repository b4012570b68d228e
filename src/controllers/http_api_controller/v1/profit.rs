use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::controllers::http_api_controller::{
    ProfitHttpApiControllerDeps,
    api_error::ApiError,
    v1::{
        dto::profit::{ProfitQuery, ProfitResponse},
        parse_address,
    },
};

pub(crate) struct ProfitHttpApiController;

impl ProfitHttpApiController {
    pub(crate) async fn handle_request(
        State(deps): State<ProfitHttpApiControllerDeps>,
        query: Result<Query<ProfitQuery>, QueryRejection>,
    ) -> Result<Json<ProfitResponse>, ApiError> {
        let Query(query) = query?;
        let address = parse_address("address", query.address.as_deref())?;

        match deps.ledger.profit(&address).await {
            Ok(Some(row)) => Ok(Json(ProfitResponse::from(&row))),
            Ok(None) => Err(ApiError::Internal(format!("no profit record for {address}"))),
            Err(error) => {
                tracing::error!(address = %address, error = %error, "Failed to read profit row");
                Err(ApiError::Internal("failed to read profit record".to_string()))
            }
        }
    }
}

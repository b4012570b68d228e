use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use grid_blockchain::{sign_digest, withdrawal_digest};
use grid_domain::{minimal_be_bytes, parse_non_negative_amount};

use crate::controllers::http_api_controller::{
    WithdrawSignatureHttpApiControllerDeps,
    api_error::ApiError,
    v1::{dto::withdraw_signature::WithdrawSignatureQuery, parse_address},
};

pub(crate) struct WithdrawSignatureHttpApiController;

impl WithdrawSignatureHttpApiController {
    /// Signs `keccak256(address ++ amount ++ nonce)` for the provider's current
    /// withdrawal nonce.
    pub(crate) async fn handle_request(
        State(deps): State<WithdrawSignatureHttpApiControllerDeps>,
        query: Result<Query<WithdrawSignatureQuery>, QueryRejection>,
    ) -> Result<Json<String>, ApiError> {
        let Query(query) = query?;
        let address = parse_address("address", query.address.as_deref())?;
        let amount = query
            .amount
            .as_deref()
            .filter(|amount| !amount.is_empty())
            .ok_or_else(|| ApiError::BadRequest("field amount is not set".to_string()))?;
        let amount = parse_non_negative_amount(amount).map_err(|_| {
            ApiError::BadRequest("field amount is not a non-negative decimal number".to_string())
        })?;

        let row = match deps.ledger.profit(&address).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                tracing::warn!(address = %address, "Withdrawal signature for unknown provider");
                return Err(ApiError::Internal(format!("no profit record for {address}")));
            }
            Err(error) => {
                tracing::error!(address = %address, error = %error, "Failed to read profit row");
                return Err(ApiError::Internal("failed to read profit record".to_string()));
            }
        };

        let digest = withdrawal_digest(&address, &minimal_be_bytes(&amount), row.nonce);
        let signature = sign_digest(&deps.signer, &digest).map_err(|error| {
            tracing::error!(address = %address, error = %error, "Failed to sign withdrawal");
            ApiError::Internal("failed to sign withdrawal".to_string())
        })?;

        tracing::info!(
            address = %address,
            amount = %amount,
            nonce = row.nonce,
            "Issued withdrawal signature"
        );
        Ok(Json(alloy::primitives::hex::encode(signature)))
    }
}

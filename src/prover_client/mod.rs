//! Prover-side client for a validator's challenge and proof endpoints.

mod error;

use std::time::Duration;

use grid_domain::{Challenge, NodeIdentity, Proof, pow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use error::ClientError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ChallengeBody {
    rnd: String,
}

#[derive(Serialize)]
struct ProofBody {
    address: String,
    id: u64,
    nonce: i64,
}

impl From<&Proof> for ProofBody {
    fn from(proof: &Proof) -> Self {
        Self {
            address: proof.identity.provider_address.to_checksum(None),
            id: proof.identity.node_id,
            nonce: proof.nonce,
        }
    }
}

/// Talks to one validator's HTTP API.
#[derive(Debug, Clone)]
pub struct ValidatorClient {
    client: Client,
    base_url: String,
}

impl ValidatorClient {
    /// `base_url` is the validator root, e.g. `http://validator:8081`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the challenge of the current round.
    pub async fn challenge(&self) -> Result<Challenge, ClientError> {
        let response = self
            .client
            .get(format!("{}/v1/rnd", self.base_url))
            .send()
            .await?;
        let response = ensure_ok(response).await?;
        let body: ChallengeBody = response.json().await?;
        Ok(Challenge::from_hex(&body.rnd)?)
    }

    /// Submits a proof; any status other than 200 is an error.
    pub async fn submit_proof(&self, proof: &Proof) -> Result<(), ClientError> {
        let response = self
            .client
            .post(format!("{}/v1/proof", self.base_url))
            .json(&ProofBody::from(proof))
            .send()
            .await?;
        ensure_ok(response).await?;
        Ok(())
    }

    /// Fetches the challenge, searches `budget` nonces from zero and submits
    /// the first proof that meets `difficulty_bits`.
    pub async fn prove(
        &self,
        identity: NodeIdentity,
        difficulty_bits: u32,
        budget: u64,
    ) -> Result<Proof, ClientError> {
        let challenge = self.challenge().await?;

        let found = tokio::task::spawn_blocking(move || {
            pow::search_nonce(&challenge, identity, difficulty_bits, 0, budget)
        })
        .await
        .map_err(|error| ClientError::Search(error.to_string()))?;
        let proof = found.ok_or(ClientError::NonceNotFound {
            difficulty_bits,
            budget,
        })?;

        tracing::debug!(identity = %identity, nonce = proof.nonce, "Submitting proof");
        self.submit_proof(&proof).await?;
        Ok(proof)
    }
}

async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    // Validator errors are JSON strings; fall back to the raw body.
    let message = serde_json::from_str::<String>(&text).unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use grid_domain::Address;
    use tokio::net::TcpListener;

    use super::*;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn challenge_decodes_rnd_hex() {
        let rnd = Challenge::from_bytes([7; 32]);
        let base_url = serve(Router::new().route(
            "/v1/rnd",
            get(move || async move { Json(serde_json::json!({ "rnd": rnd.to_hex() })) }),
        ))
        .await;

        let challenge = ValidatorClient::new(base_url).unwrap().challenge().await.unwrap();

        assert_eq!(challenge, rnd);
    }

    #[tokio::test]
    async fn short_challenge_is_rejected() {
        let base_url = serve(Router::new().route(
            "/v1/rnd",
            get(|| async { Json(serde_json::json!({ "rnd": "abcd" })) }),
        ))
        .await;

        let error = ValidatorClient::new(base_url)
            .unwrap()
            .challenge()
            .await
            .unwrap_err();

        assert!(matches!(error, ClientError::Challenge(_)));
    }

    #[tokio::test]
    async fn rejected_proof_reports_status_and_message() {
        let base_url = serve(Router::new().route(
            "/v1/proof",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json("Failure to submit proof within the proof time"),
                )
            }),
        ))
        .await;
        let proof = Proof::new(NodeIdentity::new(Address::repeat_byte(1), 1), 5);

        let error = ValidatorClient::new(base_url)
            .unwrap()
            .submit_proof(&proof)
            .await
            .unwrap_err();

        match error {
            ClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Failure to submit proof within the proof time");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_difficulty_is_reported_without_submitting() {
        let base_url = serve(Router::new().route(
            "/v1/rnd",
            get(|| async { Json(serde_json::json!({ "rnd": Challenge::default().to_hex() })) }),
        ))
        .await;
        let identity = NodeIdentity::new(Address::repeat_byte(1), 1);

        let error = ValidatorClient::new(base_url)
            .unwrap()
            .prove(identity, 255, 16)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ClientError::NonceNotFound {
                difficulty_bits: 255,
                budget: 16
            }
        ));
    }
}

use serde::Deserialize;

/// Proof body; `id` is the node id within the provider.
#[derive(Debug, Deserialize)]
pub(crate) struct ProofRequest {
    pub address: String,
    pub id: u64,
    pub nonce: i64,
}

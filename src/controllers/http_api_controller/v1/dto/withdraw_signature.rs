use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawSignatureQuery {
    pub address: Option<String>,
    pub amount: Option<String>,
}

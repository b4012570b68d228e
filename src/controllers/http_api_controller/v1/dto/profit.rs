use grid_domain::ProfitLedgerRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ProfitQuery {
    pub address: Option<String>,
}

/// Ledger row with amounts as decimal strings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfitResponse {
    pub address: String,
    pub balance: String,
    pub profit: String,
    pub penalty: String,
    pub last_time: i64,
    pub end_time: i64,
    pub nonce: u64,
}

impl From<&ProfitLedgerRow> for ProfitResponse {
    fn from(row: &ProfitLedgerRow) -> Self {
        Self {
            address: row.provider_address.to_checksum(None),
            balance: row.balance.to_string(),
            profit: row.profit.to_string(),
            penalty: row.penalty.to_string(),
            last_time: row.last_time,
            end_time: row.end_time,
            nonce: row.nonce,
        }
    }
}

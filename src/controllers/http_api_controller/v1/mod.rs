pub(crate) mod challenge;
pub(crate) mod dto;
pub(crate) mod profit;
pub(crate) mod proof;
pub(crate) mod welcome;
pub(crate) mod withdraw_signature;

use grid_domain::Address;

use super::api_error::ApiError;

/// Parses a 20-byte hex address; checksum casing is not enforced.
pub(crate) fn parse_address(field: &str, value: Option<&str>) -> Result<Address, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("field {field} is not set")))?;
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("field {field} is not a valid address")))
}

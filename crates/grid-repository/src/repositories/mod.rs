pub(crate) mod checkpoint_repository;
pub(crate) mod node_repository;
pub(crate) mod order_repository;
pub(crate) mod profit_repository;
pub(crate) mod provider_repository;

use alloy::primitives::Address;
use num_bigint::BigInt;

use crate::error::{RepositoryError, Result};

/// Addresses are stored in EIP-55 checksummed form.
pub(crate) fn address_to_db(address: &Address) -> String {
    address.to_checksum(None)
}

pub(crate) fn address_from_db(value: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|_| RepositoryError::InvalidAddress(value.to_string()))
}

pub(crate) fn amount_from_db(field: &'static str, value: &str) -> Result<BigInt> {
    grid_domain::parse_amount(value).map_err(|_| RepositoryError::InvalidNumeric {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn u64_to_db(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| RepositoryError::InvalidNumeric {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn u64_from_db(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| RepositoryError::InvalidNumeric {
        field,
        value: value.to_string(),
    })
}

pub(crate) mod challenge;
pub(crate) mod profit;
pub(crate) mod proof;
pub(crate) mod withdraw_signature;

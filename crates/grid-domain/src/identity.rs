use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Stable identity of a compute node offered by a provider.
///
/// Ordering is by provider address first, then node id, which gives
/// settlement a deterministic iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub provider_address: Address,
    pub node_id: u64,
}

impl NodeIdentity {
    pub fn new(provider_address: Address, node_id: u64) -> Self {
        Self {
            provider_address,
            node_id,
        }
    }
}

impl std::fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider_address, self.node_id)
    }
}

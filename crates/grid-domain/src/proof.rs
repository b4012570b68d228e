use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Challenge, NodeIdentity};

/// A prover's nonce for the current challenge, tied to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub identity: NodeIdentity,
    pub nonce: i64,
}

impl Proof {
    pub fn new(identity: NodeIdentity, nonce: i64) -> Self {
        Self { identity, nonce }
    }

    /// Address bytes ++ little-endian node id ++ little-endian nonce.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(20 + 8 + 8);
        bytes.extend_from_slice(self.identity.provider_address.as_slice());
        bytes.extend_from_slice(&self.identity.node_id.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes
    }

    /// `sha256(challenge ++ proof bytes)`
    pub fn hash(&self, challenge: &Challenge) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(challenge.as_bytes());
        hasher.update(self.to_bytes());
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use super::*;

    #[test]
    fn byte_layout_is_address_then_le_id_then_le_nonce() {
        let address = Address::repeat_byte(0x11);
        let proof = Proof::new(NodeIdentity::new(address, 2), -1);
        let bytes = proof.to_bytes();

        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..20], address.as_slice());
        assert_eq!(&bytes[20..28], &[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[28..], &[0xff; 8]);
    }

    #[test]
    fn hash_depends_on_challenge() {
        let proof = Proof::new(NodeIdentity::new(Address::ZERO, 1), 7);
        let a = proof.hash(&Challenge::from_bytes([1; 32]));
        let b = proof.hash(&Challenge::from_bytes([2; 32]));
        assert_ne!(a, b);
    }
}

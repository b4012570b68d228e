use alloy::{
    primitives::{Address, B256},
    signers::{
        SignerSync,
        local::{LocalSignerError, PrivateKeySigner},
    },
};

use crate::{error::BlockchainError, utils::keccak256_encode_packed};

pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, BlockchainError> {
    private_key
        .parse()
        .map_err(|e: LocalSignerError| BlockchainError::InvalidPrivateKey {
            key_length: private_key.len(),
            source: e,
        })
}

/// Fresh random secp256k1 key.
pub fn generate_signer() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

/// `keccak256(address ++ amount ++ nonce)`, with the amount as minimal
/// big-endian bytes and the nonce as 8 big-endian bytes.
pub fn withdrawal_digest(address: &Address, amount_be: &[u8], nonce: u64) -> B256 {
    B256::from(keccak256_encode_packed(&[
        address.as_slice(),
        amount_be,
        &nonce.to_be_bytes(),
    ]))
}

/// Signs a prehashed digest and returns `r ++ s ++ v` with `v` in {0, 1}.
pub fn sign_digest(signer: &PrivateKeySigner, digest: &B256) -> Result<[u8; 65], BlockchainError> {
    let signature = signer
        .sign_hash_sync(digest)
        .map_err(|e| BlockchainError::SigningFailed {
            reason: e.to_string(),
        })?;

    let mut out = [0u8; 65];
    out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    out[64] = u8::from(signature.v());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Signature;

    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn signature_recovers_validator_address() {
        let signer = signer_from_private_key(TEST_KEY).expect("valid key");
        let digest = withdrawal_digest(&Address::repeat_byte(0x42), &[0x03, 0xe8], 7);

        let bytes = sign_digest(&signer, &digest).expect("signing succeeds");
        assert!(bytes[64] <= 1);

        let signature = Signature::from_raw(&bytes).expect("65-byte signature");
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .expect("recoverable");
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn digest_binds_nonce() {
        let address = Address::repeat_byte(1);
        assert_ne!(
            withdrawal_digest(&address, &[1], 0),
            withdrawal_digest(&address, &[1], 1)
        );
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(matches!(
            signer_from_private_key("0x1234"),
            Err(BlockchainError::InvalidPrivateKey { key_length: 6, .. })
        ));
    }
}

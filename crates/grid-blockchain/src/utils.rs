use alloy::primitives::{hex, keccak256};

pub fn to_hex_string(data: impl AsRef<[u8]>) -> String {
    hex::encode(data)
}

/// Keccak256 of pre-packed bytes (addresses and integers already encoded).
pub fn keccak256_encode_packed(parts: &[&[u8]]) -> [u8; 32] {
    let total_len = parts.iter().map(|part| part.len()).sum();
    let mut packed = Vec::with_capacity(total_len);
    for part in parts {
        packed.extend_from_slice(part);
    }

    let hash = keccak256(packed);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_ref());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_hash_equals_hash_of_concatenation() {
        let joined = keccak256_encode_packed(&[b"ab", b"", b"cd"]);
        assert_eq!(joined, keccak256_encode_packed(&[b"abcd"]));
        assert_eq!(to_hex_string(joined).len(), 64);
    }
}

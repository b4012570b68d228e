//! Hash-difficulty predicate used to check proofs.

use crate::{Challenge, NodeIdentity, Proof};

/// Number of bits in a proof hash.
pub const HASH_BITS: u32 = 256;

/// Returns true iff the first `difficulty_bits` bits of `hash` (big-endian) are zero.
///
/// A difficulty of 256 or more never verifies.
pub fn verify(hash: &[u8; 32], difficulty_bits: u32) -> bool {
    if difficulty_bits >= HASH_BITS {
        return false;
    }

    let full_bytes = (difficulty_bits / 8) as usize;
    let remainder_mask = !(0xffu8 >> (difficulty_bits % 8));

    hash[..full_bytes].iter().all(|byte| *byte == 0) && hash[full_bytes] & remainder_mask == 0
}

/// Finds the first nonce in `[start, start + limit)` whose proof verifies.
pub fn search_nonce(
    challenge: &Challenge,
    identity: NodeIdentity,
    difficulty_bits: u32,
    start: i64,
    limit: u64,
) -> Option<Proof> {
    (0..limit)
        .map_while(|offset| i64::try_from(offset).ok().and_then(|o| start.checked_add(o)))
        .map(|nonce| Proof::new(identity, nonce))
        .find(|proof| verify(&proof.hash(challenge), difficulty_bits))
}

use alloy::primitives::hex;
use rand::{RngCore, rngs::OsRng};

/// Per-cycle random value provers fold into their proof-of-work hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Challenge([u8; 32]);

#[derive(Debug, thiserror::Error)]
pub enum ChallengeParseError {
    #[error("challenge is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("challenge must be 32 bytes, got {0}")]
    Length(usize),
}

impl Challenge {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh challenge from the operating system CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(value: &str) -> Result<Self, ChallengeParseError> {
        let bytes = hex::decode(value)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ChallengeParseError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

use std::time::Duration;

use grid_blockchain::{PrivateKeySigner, generate_signer, signer_from_private_key};
use grid_domain::pow::HASH_BITS;
use serde::{Deserialize, Serialize};

use super::timing::CycleTiming;
use crate::config::ConfigError;

/// Challenge cycle and proof intake settings.
///
/// **Secret handling**: the signing key is read from `validator.private_key` or the
/// `VALIDATOR_PRIVATE_KEY` environment variable. Without one a throwaway key is
/// generated at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ValidatorConfigRaw {
    /// Hex-encoded secp256k1 key used to sign withdrawal authorizations.
    pub private_key: Option<String>,

    /// Length of the Prepare phase in seconds.
    pub prepare_secs: u64,

    /// Length of the Prove phase in seconds.
    pub prove_secs: u64,

    /// Length of a whole cycle in seconds, Wait phase included.
    pub cycle_secs: u64,

    /// Leading zero bits a proof hash must have.
    pub difficulty_bits: u32,

    pub proof_queue_capacity: usize,

    /// How long a submission may wait for room in a full proof queue.
    pub submit_timeout_ms: u64,
}

#[derive(Clone)]
pub(crate) struct ValidatorConfig {
    pub signer: PrivateKeySigner,
    /// True when no key was configured and `signer` is a throwaway key.
    pub signer_generated: bool,
    pub timing: CycleTiming,
    pub difficulty_bits: u32,
    pub proof_queue_capacity: usize,
    pub submit_timeout: Duration,
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("address", &self.signer.address())
            .field("signer_generated", &self.signer_generated)
            .field("timing", &self.timing)
            .field("difficulty_bits", &self.difficulty_bits)
            .field("proof_queue_capacity", &self.proof_queue_capacity)
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

impl ValidatorConfigRaw {
    pub(crate) fn resolve(self) -> Result<ValidatorConfig, ConfigError> {
        if self.prepare_secs == 0 || self.prove_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "validator prepare_secs and prove_secs must be greater than zero".to_string(),
            ));
        }
        if self.prepare_secs + self.prove_secs >= self.cycle_secs {
            return Err(ConfigError::InvalidConfig(format!(
                "validator cycle_secs ({}) must exceed prepare_secs + prove_secs ({})",
                self.cycle_secs,
                self.prepare_secs + self.prove_secs
            )));
        }
        let cycle_secs = i64::try_from(self.cycle_secs).map_err(|_| {
            ConfigError::InvalidConfig(format!("validator cycle_secs too large: {}", self.cycle_secs))
        })?;
        if self.difficulty_bits >= HASH_BITS {
            return Err(ConfigError::InvalidConfig(format!(
                "validator difficulty_bits must be below {HASH_BITS}"
            )));
        }
        if self.proof_queue_capacity == 0 {
            return Err(ConfigError::InvalidConfig(
                "validator proof_queue_capacity must be greater than zero".to_string(),
            ));
        }

        // Resolved before the logger is installed; the caller reports a generated key.
        let (signer, signer_generated) = match self.private_key.as_deref() {
            Some(key) => (
                signer_from_private_key(key)
                    .map_err(|error| ConfigError::InvalidConfig(error.to_string()))?,
                false,
            ),
            None => (generate_signer(), true),
        };

        Ok(ValidatorConfig {
            signer,
            signer_generated,
            // Both fit: they are below cycle_secs.
            timing: CycleTiming::new(self.prepare_secs as i64, self.prove_secs as i64, cycle_secs),
            difficulty_bits: self.difficulty_bits,
            proof_queue_capacity: self.proof_queue_capacity,
            submit_timeout: Duration::from_millis(self.submit_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> ValidatorConfigRaw {
        ValidatorConfigRaw {
            private_key: Some(
                "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
            ),
            prepare_secs: 10,
            prove_secs: 10,
            cycle_secs: 120,
            difficulty_bits: 8,
            proof_queue_capacity: 100,
            submit_timeout_ms: 500,
        }
    }

    #[test]
    fn resolves_configured_key() {
        let config = raw().resolve().expect("valid config");
        assert_eq!(
            config.signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(config.timing, CycleTiming::new(10, 10, 120));
        assert!(!config.signer_generated);
    }

    #[test]
    fn generates_key_when_absent() {
        let mut raw = raw();
        raw.private_key = None;
        let config = raw.resolve().expect("valid config");
        assert!(config.signer_generated);
    }

    #[test]
    fn rejects_phases_that_fill_the_cycle() {
        let mut raw = raw();
        raw.cycle_secs = 20;
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unreachable_difficulty() {
        let mut raw = raw();
        raw.difficulty_bits = 256;
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_private_key() {
        let mut raw = raw();
        raw.private_key = Some("0x1234".to_string());
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }
}

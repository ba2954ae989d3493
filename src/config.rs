//! Exchange configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! owner = "0x00000000000000000000000000000000000000aa"
//! max_proof_depth = 32
//!
//! [domain]
//! name = "NFTExchange"
//! version = "1"
//! chain_id = 1
//! verifying_contract = "0x00000000000000000000000000000000000000ee"
//! ```

use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default upper bound on variable-length merkle proofs
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 32;

/// Signing domain parameters; every field feeds the domain separator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: "NFTExchange".to_string(),
            version: "1".to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub domain: DomainConfig,
    /// Administrative owner
    pub owner: Address,
    #[serde(default = "default_max_proof_depth")]
    pub max_proof_depth: usize,
}

fn default_max_proof_depth() -> usize {
    DEFAULT_MAX_PROOF_DEPTH
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            owner: Address::ZERO,
            max_proof_depth: DEFAULT_MAX_PROOF_DEPTH,
        }
    }
}

impl ExchangeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.name.is_empty() {
            return Err(ConfigError::Invalid("domain name must not be empty"));
        }
        if self.max_proof_depth == 0 {
            return Err(ConfigError::Invalid("max_proof_depth must be positive"));
        }
        Ok(())
    }
}

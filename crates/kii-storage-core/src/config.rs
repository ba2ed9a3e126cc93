use crate::address::Address;
use crate::error::StoreError;
use crate::store::PrivateInfoStorage;
use crate::whitelist::WHITELIST_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("whitelist capacity must hold at least the owner, got {0}")]
    InvalidCapacity(usize),
    #[error("deployment rejected: {0}")]
    Store(#[from] StoreError),
}

/// Deployment parameters for a [`PrivateInfoStorage`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    pub owner: Address,
    pub kii_private_info: String,
    #[serde(default)]
    pub wallets: Vec<Address>,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    WHITELIST_CAPACITY
}

impl StoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: StoreConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Constructs the store described by this config.
    pub fn deploy(&self) -> Result<PrivateInfoStorage, ConfigError> {
        self.validate()?;
        let store = PrivateInfoStorage::with_capacity(
            self.owner,
            self.capacity,
            self.kii_private_info.clone(),
            self.wallets.iter().copied(),
        )?;
        Ok(store)
    }
}

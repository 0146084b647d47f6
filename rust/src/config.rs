//! Configuration loader for password hashing. Cost parameters come from a JSON
//! file; an optional fixed salt is read from an environment variable or the
//! file itself and is kept in zeroizing memory.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::params::{
    Argon2idParams, DEFAULT_KEY_LENGTH, DEFAULT_MEMORY_COST_KIB, DEFAULT_PARALLELISM,
    DEFAULT_SALT_LENGTH, DEFAULT_TIME_COST,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("invalid hashing parameters: {0}")]
    Params(String),
    #[error("salt unavailable: {0}")]
    Salt(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashingConfig {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u8,
    pub key_length: u32,
    pub salt_length: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST_KIB,
            parallelism: DEFAULT_PARALLELISM,
            key_length: DEFAULT_KEY_LENGTH,
            salt_length: DEFAULT_SALT_LENGTH,
        }
    }
}

impl HashingConfig {
    fn build_params(&self) -> Result<Argon2idParams, ConfigError> {
        Argon2idParams::new(
            self.time_cost,
            self.memory_cost,
            self.parallelism,
            self.key_length,
            self.salt_length,
        )
        .map_err(|e| ConfigError::Params(format!("{e}")))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPasswordConfig {
    #[serde(default)]
    pub hashing: HashingConfig,
    /// Environment variable holding a base64 salt shared by every hash.
    pub salt_env: Option<String>,
    /// Base64 salt stored in the file; `salt_env` wins when both are set.
    pub salt_b64: Option<String>,
    pub log_level: Option<String>,
}

impl RawPasswordConfig {
    fn resolve_salt(&self) -> Result<Option<Zeroizing<Vec<u8>>>, ConfigError> {
        let encoded = if let Some(var) = &self.salt_env {
            let value =
                std::env::var(var).map_err(|e| ConfigError::Salt(format!("{var}: {e}")))?;
            Zeroizing::new(value)
        } else if let Some(b64) = &self.salt_b64 {
            Zeroizing::new(b64.clone())
        } else {
            return Ok(None);
        };

        let salt = STANDARD
            .decode(encoded.trim().as_bytes())
            .map(Zeroizing::new)
            .map_err(|e| ConfigError::Salt(format!("{e}")))?;
        if salt.len() != self.hashing.salt_length as usize {
            return Err(ConfigError::Salt(format!(
                "expected {} bytes, got {} bytes",
                self.hashing.salt_length,
                salt.len()
            )));
        }
        Ok(Some(salt))
    }
}

#[derive(Debug)]
pub struct RuntimeConfig {
    pub params: Argon2idParams,
    /// Fixed salt for every hash; `None` means a random salt per hash.
    pub salt: Option<Zeroizing<Vec<u8>>>,
    pub log_level: Option<String>,
}

impl RuntimeConfig {
    /// Salt argument for `generate_hash`: the fixed salt, or empty for a random one.
    pub fn salt_bytes(&self) -> &[u8] {
        self.salt.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            params: Argon2idParams::default(),
            salt: None,
            log_level: None,
        }
    }
}

impl TryFrom<RawPasswordConfig> for RuntimeConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPasswordConfig) -> Result<Self, Self::Error> {
        let params = raw.hashing.build_params()?;
        let salt = raw.resolve_salt()?;
        Ok(Self {
            params,
            salt,
            log_level: raw.log_level,
        })
    }
}

/// Loads the JSON configuration file and validates it into runtime values.
pub fn load_config(path: impl AsRef<Path>) -> Result<RuntimeConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let raw_config: RawPasswordConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    RuntimeConfig::try_from(raw_config)
}

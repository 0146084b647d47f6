//! Error type shared by parameter validation, hash generation, and hash
//! verification. Variants never carry password or digest bytes.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("salt length is incorrect: expected {expected} bytes, got {actual} bytes")]
    InvalidSaltLength { expected: u32, actual: usize },
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),
    #[error("invalid encoded hash")]
    InvalidEncodedHash,
    #[error("incompatible argon2 version")]
    IncompatibleVersion,
    #[error("invalid argon2 parameters: {0}")]
    InvalidParameters(String),
    #[error("invalid base64 in {field} segment")]
    InvalidBase64 { field: &'static str },
    #[error("argon2 derivation failed: {0}")]
    Derivation(String),
}

impl PasswordHashError {
    /// True for the kinds `verify_hash` reports when a stored record cannot be
    /// parsed. `InvalidParameters` is also what `Argon2idParams::new` returns.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            PasswordHashError::InvalidEncodedHash
                | PasswordHashError::IncompatibleVersion
                | PasswordHashError::InvalidParameters(_)
                | PasswordHashError::InvalidBase64 { .. }
        )
    }
}

//! Password hashing helpers built around Argon2id.
//! Every function here is a pure function of its arguments plus, when no salt
//! is supplied, one read from the OS random source. Parameters are passed in
//! explicitly so different callers can run different cost profiles side by side.

use argon2::{Algorithm, Argon2, Version};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::encoding::{self, DecodedHash};
use super::error::PasswordHashError;
use super::params::Argon2idParams;

/// The memory-hard step. Implementations fill `out` completely, whose length
/// is the parameter set's key length.
pub(crate) trait KeyDerivation {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Argon2idParams,
        out: &mut [u8],
    ) -> Result<(), PasswordHashError>;
}

/// Argon2id, version 0x13.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Argon2id;

impl KeyDerivation for Argon2id {
    fn derive(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Argon2idParams,
        out: &mut [u8],
    ) -> Result<(), PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);
        argon2
            .hash_password_into(password, salt, out)
            .map_err(|e| PasswordHashError::Derivation(format!("{e}")))
    }
}

/// Hashes `password` and returns the encoded string. An empty `salt` asks for
/// a fresh random salt of `params.salt_length()` bytes; a non-empty one must
/// have exactly that length.
pub fn generate_hash(
    password: &[u8],
    salt: &[u8],
    params: &Argon2idParams,
) -> Result<String, PasswordHashError> {
    generate_hash_with(&Argon2id, &mut OsRng, password, salt, params)
}

/// Same as [`generate_hash`] with an explicit derivation and random source.
pub(crate) fn generate_hash_with<D, R>(
    kdf: &D,
    rng: &mut R,
    password: &[u8],
    salt: &[u8],
    params: &Argon2idParams,
) -> Result<String, PasswordHashError>
where
    D: KeyDerivation + ?Sized,
    R: RngCore + CryptoRng + ?Sized,
{
    validate_salt_length(salt, params.salt_length())?;

    let salt = if salt.is_empty() {
        generate_salt(rng, params.salt_length())?
    } else {
        Zeroizing::new(salt.to_vec())
    };

    debug!(
        m_cost = params.memory_cost(),
        t_cost = params.time_cost(),
        p_cost = params.parallelism(),
        "deriving password hash"
    );
    let mut digest = Zeroizing::new(vec![0u8; params.key_length() as usize]);
    kdf.derive(password, &salt, params, &mut digest)?;

    Ok(encoding::encode(params, &salt, &digest))
}

/// Checks `password` against a stored encoded hash.
///
/// `Ok(false)` means the record is well formed and the password is wrong.
/// A record that cannot be parsed is always an `Err`, so callers can tell a
/// wrong password apart from a corrupt record.
pub fn verify_hash(password: &[u8], encoded: &str) -> Result<bool, PasswordHashError> {
    verify_hash_with(&Argon2id, password, encoded)
}

/// Same as [`verify_hash`] with an explicit derivation.
pub(crate) fn verify_hash_with<D>(
    kdf: &D,
    password: &[u8],
    encoded: &str,
) -> Result<bool, PasswordHashError>
where
    D: KeyDerivation + ?Sized,
{
    let decoded = DecodedHash::parse(encoded).map_err(|err| {
        warn!(error = %err, "rejecting malformed password hash");
        err
    })?;

    debug!(
        m_cost = decoded.params.memory_cost(),
        t_cost = decoded.params.time_cost(),
        p_cost = decoded.params.parallelism(),
        "verifying password hash"
    );
    let mut candidate = Zeroizing::new(vec![0u8; decoded.digest.len()]);
    kdf.derive(password, &decoded.salt, &decoded.params, &mut candidate)?;

    Ok(constant_time_eq(&candidate, &decoded.digest))
}

/// Reports whether a stored hash was produced with parameters other than
/// `params`. Only the parameters are compared; the password is not involved.
pub fn needs_rehash(encoded: &str, params: &Argon2idParams) -> Result<bool, PasswordHashError> {
    let decoded = DecodedHash::parse(encoded)?;
    Ok(decoded.params != *params)
}

fn validate_salt_length(salt: &[u8], expected: u32) -> Result<(), PasswordHashError> {
    if !salt.is_empty() && salt.len() != expected as usize {
        warn!(expected, actual = salt.len(), "salt length is incorrect");
        return Err(PasswordHashError::InvalidSaltLength {
            expected,
            actual: salt.len(),
        });
    }
    Ok(())
}

fn generate_salt<R>(rng: &mut R, length: u32) -> Result<Zeroizing<Vec<u8>>, PasswordHashError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut salt = Zeroizing::new(vec![0u8; length as usize]);
    rng.try_fill_bytes(&mut salt)
        .map_err(|e| PasswordHashError::RandomSourceUnavailable(format!("{e}")))?;
    Ok(salt)
}

/// Equal-length inputs are compared over every byte. Lengths are not secret:
/// they are part of the stored parameters.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

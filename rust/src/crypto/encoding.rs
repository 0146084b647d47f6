//! The encoded hash format:
//!
//! ```text
//! $argon2id$v=19$m=<memory>,t=<time>,p=<parallelism>$<base64 salt>$<base64 digest>
//! ```
//!
//! Decoding is a strict indexed walk over exactly six `$` fields. The first
//! malformed field aborts the parse and nothing partially decoded escapes.

use base64::{engine::general_purpose::STANDARD, Engine};
use zeroize::Zeroizing;

use super::error::PasswordHashError;
use super::params::Argon2idParams;

pub(crate) const SCHEME: &str = "argon2id";
/// Argon2 version 0x13, the only version the derivation produces.
pub(crate) const ARGON2_VERSION: u32 = 0x13;

const DELIMITER: char = '$';
const FIELD_COUNT: usize = 6;

/// Serializes parameters, salt and digest into the canonical encoded string.
pub(crate) fn encode(params: &Argon2idParams, salt: &[u8], digest: &[u8]) -> String {
    format!(
        "${SCHEME}$v={ARGON2_VERSION}$m={},t={},p={}${}${}",
        params.memory_cost(),
        params.time_cost(),
        params.parallelism(),
        STANDARD.encode(salt),
        STANDARD.encode(digest),
    )
}

/// A fully parsed encoded hash. The parameter set carries the salt and key
/// lengths observed in the record.
pub(crate) struct DecodedHash {
    pub(crate) params: Argon2idParams,
    pub(crate) salt: Zeroizing<Vec<u8>>,
    pub(crate) digest: Zeroizing<Vec<u8>>,
}

impl DecodedHash {
    pub(crate) fn parse(encoded: &str) -> Result<Self, PasswordHashError> {
        let fields: Vec<&str> = encoded.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT || !fields[0].is_empty() || fields[1] != SCHEME {
            return Err(PasswordHashError::InvalidEncodedHash);
        }

        let version = fields[2]
            .strip_prefix("v=")
            .and_then(parse_decimal::<u32>)
            .ok_or(PasswordHashError::IncompatibleVersion)?;
        if version != ARGON2_VERSION {
            return Err(PasswordHashError::IncompatibleVersion);
        }

        let (memory_cost, time_cost, parallelism) = parse_cost_triple(fields[3])?;

        let salt = decode_base64(fields[4], "salt")?;
        let digest = decode_base64(fields[5], "digest")?;

        let key_length = u32::try_from(digest.len())
            .map_err(|_| PasswordHashError::InvalidParameters("digest too long".to_string()))?;
        let salt_length = u32::try_from(salt.len())
            .map_err(|_| PasswordHashError::InvalidParameters("salt too long".to_string()))?;
        let params =
            Argon2idParams::new(time_cost, memory_cost, parallelism, key_length, salt_length)?;

        Ok(Self { params, salt, digest })
    }

    /// Re-encodes the parsed fields. For any string `parse` accepts this
    /// reproduces the input byte for byte.
    #[cfg(test)]
    pub(crate) fn encode(&self) -> String {
        encode(&self.params, &self.salt, &self.digest)
    }
}

fn parse_cost_triple(field: &str) -> Result<(u32, u32, u8), PasswordHashError> {
    let malformed = || PasswordHashError::InvalidParameters("malformed cost section".to_string());

    let mut parts = field.split(',');
    let memory = parts.next().and_then(|p| p.strip_prefix("m=")).ok_or_else(malformed)?;
    let time = parts.next().and_then(|p| p.strip_prefix("t=")).ok_or_else(malformed)?;
    let lanes = parts.next().and_then(|p| p.strip_prefix("p=")).ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }

    let memory = parse_decimal::<u32>(memory).ok_or_else(malformed)?;
    let time = parse_decimal::<u32>(time).ok_or_else(malformed)?;
    let lanes = parse_decimal::<u8>(lanes).ok_or_else(malformed)?;
    Ok((memory, time, lanes))
}

/// Parses an unsigned decimal in canonical form: ASCII digits only, no sign,
/// no leading zeros. Overflow of the target width is rejected.
fn parse_decimal<T: std::str::FromStr>(text: &str) -> Option<T> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return None;
    }
    text.parse().ok()
}

fn decode_base64(
    segment: &str,
    field: &'static str,
) -> Result<Zeroizing<Vec<u8>>, PasswordHashError> {
    STANDARD
        .decode(segment.as_bytes())
        .map(Zeroizing::new)
        .map_err(|_| PasswordHashError::InvalidBase64 { field })
}

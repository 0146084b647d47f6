//! Argon2id cost parameters. A parameter set is validated once at construction
//! and is read-only afterwards, so every hash produced from it is derivable.

use argon2::{MIN_SALT_LEN, Params};

use super::error::PasswordHashError;

/// Defaults follow the OWASP password storage cheat sheet for Argon2id.
/// - memory_cost: 19 MiB
/// - time_cost: 2 iterations
/// - parallelism: 1 lane
pub const DEFAULT_MEMORY_COST_KIB: u32 = 19 * 1024;
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_PARALLELISM: u8 = 1;
pub const DEFAULT_KEY_LENGTH: u32 = 32;
pub const DEFAULT_SALT_LENGTH: u32 = 32;

/// Ceiling on memory cost: 4 GiB. A stored record asking for more is treated
/// as corrupt rather than handed to the allocator.
pub const MAX_MEMORY_COST_KIB: u32 = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argon2idParams {
    time_cost: u32,
    memory_cost: u32,
    parallelism: u8,
    key_length: u32,
    salt_length: u32,
}

impl Argon2idParams {
    /// Builds a parameter set, rejecting values the derivation cannot run with.
    pub fn new(
        time_cost: u32,
        memory_cost: u32,
        parallelism: u8,
        key_length: u32,
        salt_length: u32,
    ) -> Result<Self, PasswordHashError> {
        if time_cost < Params::MIN_T_COST {
            return Err(PasswordHashError::InvalidParameters(format!(
                "time cost must be at least {}",
                Params::MIN_T_COST
            )));
        }
        if parallelism == 0 {
            return Err(PasswordHashError::InvalidParameters(
                "parallelism must be at least 1".to_string(),
            ));
        }
        let min_memory = 8 * u32::from(parallelism);
        if memory_cost < min_memory {
            return Err(PasswordHashError::InvalidParameters(format!(
                "memory cost must be at least {min_memory} KiB for {parallelism} lanes"
            )));
        }
        if memory_cost > MAX_MEMORY_COST_KIB {
            return Err(PasswordHashError::InvalidParameters(format!(
                "memory cost must be at most {MAX_MEMORY_COST_KIB} KiB"
            )));
        }
        if (key_length as usize) < Params::MIN_OUTPUT_LEN {
            return Err(PasswordHashError::InvalidParameters(format!(
                "key length must be at least {} bytes",
                Params::MIN_OUTPUT_LEN
            )));
        }
        if (salt_length as usize) < MIN_SALT_LEN {
            return Err(PasswordHashError::InvalidParameters(format!(
                "salt length must be at least {MIN_SALT_LEN} bytes"
            )));
        }

        Ok(Self {
            time_cost,
            memory_cost,
            parallelism,
            key_length,
            salt_length,
        })
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    /// Memory usage in KiB.
    pub fn memory_cost(&self) -> u32 {
        self.memory_cost
    }

    pub fn parallelism(&self) -> u8 {
        self.parallelism
    }

    pub fn key_length(&self) -> u32 {
        self.key_length
    }

    pub fn salt_length(&self) -> u32 {
        self.salt_length
    }

    /// Converts into the backend's parameter type with the output length fixed
    /// to `key_length`.
    pub(crate) fn to_argon2(self) -> Result<Params, PasswordHashError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            u32::from(self.parallelism),
            Some(self.key_length as usize),
        )
        .map_err(|e| PasswordHashError::Derivation(format!("{e}")))
    }
}

impl Default for Argon2idParams {
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

#[cfg(test)]
mod tests {
    use super::{Argon2idParams, MAX_MEMORY_COST_KIB};
    use crate::crypto::error::PasswordHashError;

    #[test]
    fn default_matches_documented_values() {
        let params = Argon2idParams::default();
        assert_eq!(params.time_cost(), 2);
        assert_eq!(params.memory_cost(), 19456);
        assert_eq!(params.parallelism(), 1);
        assert_eq!(params.key_length(), 32);
        assert_eq!(params.salt_length(), 32);
        assert_eq!(Argon2idParams::new(2, 19456, 1, 32, 32), Ok(params));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            Argon2idParams::new(0, 19456, 1, 32, 32),
            Argon2idParams::new(2, 19456, 0, 32, 32),
            Argon2idParams::new(2, 31, 4, 32, 32),
            Argon2idParams::new(2, 19456, 1, 3, 32),
            Argon2idParams::new(2, 19456, 1, 32, 7),
            Argon2idParams::new(2, u32::MAX, 1, 32, 32),
        ];
        for case in cases {
            assert!(matches!(case, Err(PasswordHashError::InvalidParameters(_))));
        }
    }

    #[test]
    fn memory_floor_scales_with_lanes() {
        assert!(Argon2idParams::new(1, 32, 4, 16, 16).is_ok());
        assert!(Argon2idParams::new(1, 8, 1, 4, 8).is_ok());
    }

    #[test]
    fn memory_ceiling_is_inclusive() {
        assert!(Argon2idParams::new(1, MAX_MEMORY_COST_KIB, 1, 32, 16).is_ok());
        assert!(matches!(
            Argon2idParams::new(1, MAX_MEMORY_COST_KIB + 1, 1, 32, 16),
            Err(PasswordHashError::InvalidParameters(_))
        ));
    }

    #[test]
    fn converts_to_backend_params() {
        let params = Argon2idParams::new(3, 64, 2, 24, 16).expect("valid params");
        let backend = params.to_argon2().expect("backend accepts validated params");
        assert_eq!(backend.m_cost(), 64);
        assert_eq!(backend.t_cost(), 3);
        assert_eq!(backend.p_cost(), 2);
        assert_eq!(backend.output_len(), Some(24));
    }
}

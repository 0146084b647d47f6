//! Password hashing core. Parameters, the encoded string format, and the
//! generate/verify functions each live in their own submodule so the security
//! relevant parsing stays small and auditable.
//!
//! Only the encoded string leaves this module. Decoded salts and digests stay
//! crate-private:
//!
//! ```compile_fail
//! let decoded = zenith_crypto::crypto::encoding::DecodedHash::parse(
//!     "$argon2id$v=19$m=64,t=1,p=1$c29tZXNhbHRzb21lc2FsdA==$3q2+7w==",
//! );
//! ```

pub(crate) mod encoding;
pub mod error;
pub mod params;
pub mod passwords;

pub use error::PasswordHashError;
pub use params::Argon2idParams;
pub use passwords::{generate_hash, needs_rehash, verify_hash};

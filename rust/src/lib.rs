//! Argon2id password hashing for Zenith account credentials.
//! Callers hand in a plaintext and get back a single self-describing string to
//! store; verification needs nothing but that string.

pub mod config;
pub mod crypto;

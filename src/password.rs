//! Salted password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//! The salt is embedded in the string, so verification only needs the stored
//! value and the candidate password.

use anyhow::{Result, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;

const SALT_LEN: usize = 16;

/// Hash `password` with a freshly generated random salt.
///
/// # Errors
/// Returns an error if the salt cannot be encoded or hashing fails.
pub fn hash(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow!("Failed to encode password salt: {e}"))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {e}"))
}

/// Check `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
/// Returns an error if `stored` is not a valid PHC string.
pub fn verify(stored: &str, password: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow!("Invalid stored password hash: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

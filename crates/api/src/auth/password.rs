//! Password storage. Hashes are Argon2id PHC strings with a per-user salt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

fn argon2id() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

pub fn hash_password(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2id()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// `Ok(false)` means the password is wrong; `Err` means the stored hash is corrupt.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, HashError> {
    let phc = PasswordHash::new(stored)?;
    // Parameters come from the PHC string, not from `argon2id()`.
    match argon2id().verify_password(plain.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

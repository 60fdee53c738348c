use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use crate::error::AppError;

/// Hash with a fresh random salt, returning the PHC string to store.
pub fn hash(argon2: &Argon2<'_>, plaintext: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2.hash_password(plaintext.as_bytes(), &salt)?.to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; errors only when `stored` is not a valid PHC hash.
pub fn verify(argon2: &Argon2<'_>, plaintext: &str, stored: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(stored)?;
    match argon2.verify_password(plaintext.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

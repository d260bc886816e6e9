//! bcrypt password hashes.
//!
//! The configured work factor is the bcrypt cost, clamped to the range
//! bcrypt accepts.

use bcrypt::BcryptError;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[source] BcryptError),

    #[error("Malformed password hash: {0}")]
    Malformed(#[source] BcryptError),
}

pub fn hash_password(password: &str, work_factor: u32) -> Result<String, PasswordError> {
    bcrypt::hash(password, work_factor.clamp(MIN_COST, MAX_COST)).map_err(PasswordError::Hash)
}

/// `Ok(false)` for a wrong password; `Err` when `stored` is not a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, stored).map_err(PasswordError::Malformed)
}

use std::borrow::Cow;

use crate::error::AppError;
use bcrypt::{hash, verify};
use validator::ValidationError;

/// bcrypt ignores everything past this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Field validator for request schemas. Counts bytes, not characters.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some(Cow::from(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
        return Err(err);
    }
    Ok(())
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Verifies `password` against a bcrypt hash.
///
/// An empty or malformed hash is treated as a mismatch rather than an error, and so is
/// a password too long to have been hashed in full.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    if hashed_password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

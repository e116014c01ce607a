//! Password validation.
//!
//! Pre-flight check run before any key derivation on the encrypt path.

use super::MIN_PASSWORD_LENGTH;
use crate::error::{CryptError, Result};

/// Validate that a password is long enough to encrypt with.
///
/// Length is counted in characters, not bytes, so `"пароль"` (six Cyrillic
/// letters) passes.
///
/// # Examples
///
/// ```
/// use imgcrypt_core::crypto::validate_password;
///
/// assert!(validate_password("secret1").is_ok());
/// assert!(validate_password("short").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CryptError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

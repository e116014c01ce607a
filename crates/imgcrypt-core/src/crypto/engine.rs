//! Encrypt and decrypt images with a password.
//!
//! Each call generates or reads its own salt and IV, derives a one-shot key,
//! and drops it before returning. Nothing is kept between calls.

use chrono::Utc;

use super::key::derive_key;
use super::password::validate_password;
use super::{FORMAT_VERSION, IV_LENGTH, MAX_PLAINTEXT_BYTES, SALT_LENGTH};
use crate::error::{CryptError, Result};
use crate::payload::EncryptedPayload;

/// Stateless crypto engine.
///
/// Holds only the plaintext size limit; every operation is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoEngine {
    max_plaintext_bytes: usize,
}

impl Default for CryptoEngine {
    fn default() -> Self {
        Self {
            max_plaintext_bytes: MAX_PLAINTEXT_BYTES,
        }
    }
}

impl CryptoEngine {
    /// Create an engine with a custom plaintext size limit.
    pub fn with_max_plaintext_bytes(max_plaintext_bytes: usize) -> Self {
        Self {
            max_plaintext_bytes,
        }
    }

    pub fn max_plaintext_bytes(&self) -> usize {
        self.max_plaintext_bytes
    }

    /// Encrypt `plaintext` under `password`.
    ///
    /// # Errors
    ///
    /// - `WeakPassword` if the password is shorter than 6 characters
    /// - `InvalidInput` if the plaintext is empty or over the size limit
    /// - `Encryption` if the platform RNG or the AEAD fails
    ///
    /// Validation happens before any randomness is drawn or key derived.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        password: &str,
        mime_type: Option<&str>,
    ) -> Result<EncryptedPayload> {
        validate_password(password)?;

        if plaintext.is_empty() {
            return Err(CryptError::InvalidInput("image data is empty".to_string()));
        }

        if plaintext.len() > self.max_plaintext_bytes {
            return Err(CryptError::InvalidInput(format!(
                "image is {} bytes; the limit is {} bytes",
                plaintext.len(),
                self.max_plaintext_bytes
            )));
        }

        let salt = random_bytes::<SALT_LENGTH>()?;
        let iv = random_bytes::<IV_LENGTH>()?;

        let key = derive_key(password, &salt)?;
        let ciphertext = key.seal(&iv, plaintext)?;
        drop(key);

        tracing::debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "image encrypted"
        );

        Ok(EncryptedPayload::new(
            salt,
            iv,
            ciphertext,
            mime_type.map(str::to_string),
            FORMAT_VERSION,
            Utc::now().timestamp_millis(),
        ))
    }

    /// Decrypt `payload` with `password`.
    ///
    /// # Errors
    ///
    /// - `InvalidPayload` if salt, IV, or ciphertext lengths are wrong
    ///   (checked before any key derivation)
    /// - `KeyDerivation` if the password is empty
    /// - `AuthenticationFailed` for a wrong password or tampered payload;
    ///   AES-GCM cannot tell the two apart
    pub fn decrypt(&self, payload: &EncryptedPayload, password: &str) -> Result<Vec<u8>> {
        payload.validate()?;

        let iv: [u8; IV_LENGTH] = payload
            .iv()
            .try_into()
            .map_err(|_| CryptError::InvalidPayload("iv must be 12 bytes".to_string()))?;

        let key = derive_key(password, payload.salt())?;
        let plaintext = key.open(&iv, payload.ciphertext())?;

        tracing::debug!(plaintext_len = plaintext.len(), "image decrypted");
        Ok(plaintext)
    }
}

/// Encrypt with the default 50 MiB limit.
///
/// # Examples
///
/// ```
/// use imgcrypt_core::crypto::{decrypt, encrypt};
///
/// let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// let payload = encrypt(&png, "secret1", Some("image/png")).unwrap();
/// assert_eq!(payload.ciphertext().len(), png.len() + 16);
///
/// let decrypted = decrypt(&payload, "secret1").unwrap();
/// assert_eq!(decrypted, png);
/// ```
pub fn encrypt(
    plaintext: &[u8],
    password: &str,
    mime_type: Option<&str>,
) -> Result<EncryptedPayload> {
    CryptoEngine::default().encrypt(plaintext, password, mime_type)
}

/// Decrypt a payload produced by [`encrypt`].
pub fn decrypt(payload: &EncryptedPayload, password: &str) -> Result<Vec<u8>> {
    CryptoEngine::default().decrypt(payload, password)
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| CryptError::Encryption(format!("secure random source failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::TAG_LENGTH;

    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52,
    ];

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let payload = encrypt(&PNG_HEADER, "secret1", Some("image/png")).unwrap();
        let decrypted = decrypt(&payload, "secret1").unwrap();
        assert_eq!(decrypted, PNG_HEADER);
    }

    #[test]
    fn test_payload_shape() {
        let payload = encrypt(&PNG_HEADER, "secret1", Some("image/png")).unwrap();
        assert_eq!(payload.salt().len(), SALT_LENGTH);
        assert_eq!(payload.iv().len(), IV_LENGTH);
        assert_eq!(payload.ciphertext().len(), PNG_HEADER.len() + TAG_LENGTH);
        assert_eq!(payload.mime_type(), Some("image/png"));
        assert_eq!(payload.version(), Some(FORMAT_VERSION));
        assert!(payload.timestamp().unwrap() > 0);
    }

    #[test]
    fn test_single_byte_round_trip() {
        let payload = encrypt(&[0x42], "secret1", None).unwrap();
        assert!(payload.mime_type().is_none());
        assert_eq!(decrypt(&payload, "secret1").unwrap(), vec![0x42]);
    }

    #[test]
    fn test_wrong_password_fails() {
        let payload = encrypt(&PNG_HEADER, "secret1", None).unwrap();
        assert!(matches!(
            decrypt(&payload, "wrong99"),
            Err(CryptError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_weak_password_rejected_before_crypto() {
        let result = encrypt(&PNG_HEADER, "12345", None);
        assert!(matches!(result, Err(CryptError::WeakPassword { min: 6 })));
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        let result = encrypt(&[], "secret1", None);
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));
    }

    #[test]
    fn test_size_limit_enforced() {
        let engine = CryptoEngine::with_max_plaintext_bytes(8);
        assert!(engine.encrypt(&[1u8; 8], "secret1", None).is_ok());

        let result = engine.encrypt(&[1u8; 9], "secret1", None);
        match result {
            Err(CryptError::InvalidInput(detail)) => assert!(detail.contains("limit is 8 bytes")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_empty_password_is_key_derivation_error() {
        let payload = encrypt(&PNG_HEADER, "secret1", None).unwrap();
        assert!(matches!(
            decrypt(&payload, ""),
            Err(CryptError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_default_engine_limit() {
        assert_eq!(CryptoEngine::default().max_plaintext_bytes(), 52_428_800);
    }
}

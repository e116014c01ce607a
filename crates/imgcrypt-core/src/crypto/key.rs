//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The derived key is wrapped in a cipher handle straight away. Callers get
//! AES-256-GCM seal/open and nothing else.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{IV_LENGTH, KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
use crate::error::{CryptError, Result};

/// An AES-256-GCM key derived from a password.
///
/// There is no accessor for the raw key bytes. The intermediate buffer is
/// zeroized as soon as the cipher is keyed, and the cipher's round keys are
/// zeroized when this value is dropped.
pub struct DerivedKey {
    cipher: Aes256Gcm,
}

impl DerivedKey {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(bytes)
            .map_err(|e| CryptError::KeyDerivation(format!("invalid key length: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext`, returning ciphertext with the 16-byte tag appended.
    pub(crate) fn seal(&self, iv: &[u8; IV_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .encrypt(Nonce::from_slice(iv), plaintext)
            .map_err(|e| CryptError::Encryption(format!("AES-GCM seal failed: {}", e)))
    }

    /// Decrypt and verify `ciphertext` (tag appended).
    pub(crate) fn open(&self, iv: &[u8; IV_LENGTH], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .decrypt(Nonce::from_slice(iv), ciphertext)
            .map_err(|_| {
                // aes-gcm does not say why; a bad key and a flipped bit look the same
                tracing::debug!(
                    ciphertext_len = ciphertext.len(),
                    "AES-GCM tag verification failed"
                );
                CryptError::AuthenticationFailed
            })
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an AES-256-GCM key from a password.
///
/// # Arguments
///
/// * `password` - UTF-8 password, must not be empty
/// * `salt` - Exactly 16 random bytes, stored alongside the ciphertext
///
/// # Security
///
/// - Same password + salt always produces the same key
/// - 250,000 PBKDF2 rounds make each guess expensive
///
/// # Examples
///
/// ```
/// use imgcrypt_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("correct horse", &salt).unwrap();
/// assert!(format!("{:?}", key).contains("REDACTED"));
/// ```
pub fn derive_key(password: &str, salt: &[u8]) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(CryptError::KeyDerivation(
            "password cannot be empty".to_string(),
        ));
    }

    if salt.len() != SALT_LENGTH {
        return Err(CryptError::KeyDerivation(format!(
            "salt must be {} bytes (got {})",
            SALT_LENGTH,
            salt.len()
        )));
    }

    let mut key_bytes = Zeroizing::new([0u8; KEY_LENGTH]);
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut key_bytes[..],
    );

    DerivedKey::from_bytes(&key_bytes[..])
}

//! Password-based image encryption.
//!
//! This module provides the crypto engine used by the worker boundary:
//! - **PBKDF2-HMAC-SHA256**: stretches the password into an AES key
//! - **AES-256-GCM**: authenticated encryption, tag appended to ciphertext
//!
//! ## Security Model
//!
//! - Fresh 16-byte salt and 12-byte IV from the OS CSPRNG on every encryption
//! - Derived keys live only for one call, cannot be exported, and are
//!   zeroized on drop
//! - Wrong password and tampered data fail with the same error
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of an encrypted payload file
//! - Tampering with any byte of the payload
//!
//! We do NOT defend against:
//! - Compromised host process / malicious code in the same runtime
//! - Weak passwords beyond the minimum length check

pub mod engine;
pub mod key;
pub mod password;

pub use engine::{decrypt, encrypt, CryptoEngine};
pub use key::{derive_key, DerivedKey};
pub use password::validate_password;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM IV length in bytes (96 bits).
pub const IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const TAG_LENGTH: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2 iteration count. Part of the payload format: changing it breaks
/// decryption of existing files.
pub const PBKDF2_ITERATIONS: u32 = 250_000;

/// Minimum password length, in characters, for encryption.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Default maximum plaintext size (50 MiB).
pub const MAX_PLAINTEXT_BYTES: usize = 50 * 1024 * 1024;

/// Version tag written into every payload.
pub const FORMAT_VERSION: &str = "1.0";

//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (input file, config).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, weak password, or malformed payload.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong password or corrupted payload.
    pub const AUTH_FAILED: i32 = 5;

    /// The worker did not finish in time.
    pub const TIMEOUT: i32 = 6;
}

/// Environment variable holding the password.
pub const PASSWORD_ENV: &str = "IMGCRYPT_PASSWORD";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "IMGCRYPT_CONFIG";

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "IMGCRYPT_LOG";

/// Extension appended to encrypted payload files.
pub const PAYLOAD_EXTENSION: &str = "json";

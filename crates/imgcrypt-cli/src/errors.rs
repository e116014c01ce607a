//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes so scripts can tell a missing
//! file from a wrong password.

use std::fmt;

use imgcrypt_core::CryptError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (input file, config)
    NotFound { message: String, hint: String },

    /// Wrong password or corrupted payload
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// The worker did not answer in time
    Timeout(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) | CliError::Timeout(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Classify a core error. Returns `None` for errors that should exit
    /// with the generic code.
    pub fn from_crypt(err: &CryptError) -> Option<Self> {
        match err.kind() {
            "authentication_failed" => Some(Self::auth_failed_with_hint(
                err.user_message(),
                format!(
                    "Hint: Check the password. Set {} to avoid typos in prompts.",
                    crate::constants::PASSWORD_ENV
                ),
            )),
            "invalid_input" | "weak_password" | "invalid_payload" => {
                Some(Self::invalid_input(err.user_message()))
            }
            "timeout" => Some(CliError::Timeout(format!(
                "{}\nHint: Raise [worker] task_timeout_seconds in the config, or set it to 0.",
                err.user_message()
            ))),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Timeout(_) => exit_codes::TIMEOUT,
        }
    }
}

/// Exit code for any error returned from a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(crypt_err) = err.downcast_ref::<CryptError>() {
        if let Some(cli_err) = CliError::from_crypt(crypt_err) {
            return cli_err.exit_code();
        }
    }
    1
}

//! Password acquisition: environment variable first, then a prompt.

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// Password for encryption. Prompts twice so a typo cannot lock the image.
pub fn encryption_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }
    if !interactive {
        return Err(missing_password());
    }
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Password for decryption.
pub fn decryption_password(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = password_from_env() {
        return Ok(password);
    }
    if !interactive {
        return Err(missing_password());
    }
    Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}

fn missing_password() -> anyhow::Error {
    CliError::invalid_input(format!(
        "No password provided and no TTY available. Set {}.",
        PASSWORD_ENV
    ))
    .into()
}

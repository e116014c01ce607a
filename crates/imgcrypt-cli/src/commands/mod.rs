pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod inspect;
pub mod misc;

use std::path::Path;

use crate::errors::CliError;

/// Refuse to replace an existing file unless `--force` was given.
fn ensure_writable(output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "Output {} already exists. Use --force to overwrite.",
            output.display()
        ))
        .into());
    }
    Ok(())
}

//! Application context for the imgcrypt CLI.
//!
//! Bundles the parsed CLI arguments with the loaded configuration so command
//! handlers take one parameter.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{load_config, resolve_config_path, ImgcryptConfig};
use crate::ui::UiContext;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: PathBuf,
    config: ImgcryptConfig,
}

impl<'a> AppContext<'a> {
    /// Resolve and load the configuration for this invocation.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = load_config(&config_path)?;
        Ok(Self {
            cli,
            config_path,
            config,
        })
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn config(&self) -> &ImgcryptConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Prompts are allowed only on a terminal and without `--no-input`.
    pub fn interactive(&self) -> bool {
        !self.cli.no_input && self.ui_context(false).is_interactive()
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.quiet)
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use imgcrypt_core::crypto::MAX_PLAINTEXT_BYTES;
use imgcrypt_core::WorkerConfig;

use crate::constants::CONFIG_ENV;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImgcryptConfig {
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub worker: WorkerSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_image_bytes: usize,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_PLAINTEXT_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSection {
    /// 0 disables the timeout
    pub task_timeout_seconds: u64,
    pub recycle_after_task: bool,
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            task_timeout_seconds: 300,
            recycle_after_task: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ImgcryptConfig {
    pub fn worker_config(&self) -> WorkerConfig {
        let task_timeout = match self.worker.task_timeout_seconds {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        };
        WorkerConfig {
            task_timeout,
            recycle_after_task: self.worker.recycle_after_task,
            auto_respawn: true,
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn read_config(path: &Path) -> anyhow::Result<ImgcryptConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config if it exists, otherwise fall back to defaults.
pub fn load_config(path: &Path) -> anyhow::Result<ImgcryptConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(ImgcryptConfig::default())
    }
}

pub fn write_config(path: &Path, config: &ImgcryptConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("imgcrypt"));
        }
    }
    Ok(home_dir()?.join(".config").join("imgcrypt"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImgcryptConfig::default();
        assert_eq!(config.limits.max_image_bytes, 52_428_800);
        assert_eq!(config.worker.task_timeout_seconds, 300);
        assert!(!config.worker.recycle_after_task);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ImgcryptConfig =
            toml::from_str("[worker]\nrecycle_after_task = true\n").unwrap();
        assert!(config.worker.recycle_after_task);
        assert_eq!(config.worker.task_timeout_seconds, 300);
        assert_eq!(config.limits, LimitsSection::default());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let mut config = ImgcryptConfig::default();
        assert_eq!(
            config.worker_config().task_timeout,
            Some(Duration::from_secs(300))
        );

        config.worker.task_timeout_seconds = 0;
        assert!(config.worker_config().task_timeout.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ImgcryptConfig::default();
        config.log.level = "debug".to_string();
        write_config(&path, &config).unwrap();

        assert_eq!(read_config(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ImgcryptConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_image_bytes = \"lots\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}

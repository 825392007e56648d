use super::{get_config_dir, EngineConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Locates and reads the engine configuration.
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for the per-user `config.toml`.
    pub fn new() -> Self {
        Self {
            path: get_config_dir().ok().map(|dir| dir.join("config.toml")),
        }
    }

    /// Loader for an explicit file, which then has to exist.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the configuration, falling back to defaults when the per-user
    /// file does not exist. Environment overrides are applied last.
    pub async fn load(&self, explicit: bool) -> Result<EngineConfig> {
        let mut config = match &self.path {
            Some(path) if explicit || path.exists() => {
                let content = fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let config = EngineConfig::from_toml_str(&content)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?;
                tracing::debug!("Loaded configuration from {}", path.display());
                config
            }
            _ => {
                tracing::debug!("No configuration file, using defaults");
                EngineConfig::default()
            }
        };

        config.merge_env_vars();
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "disabled = [\"cleanupHardDelete\"]\n").unwrap();

        let config = ConfigLoader::with_path(&path).load(true).await.unwrap();
        assert_eq!(config.disabled, ["cleanupHardDelete"]);
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("nope.toml"));
        assert!(loader.load(true).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("nope.toml"));
        let config = loader.load(false).await.unwrap();
        assert!(config.actions.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shell = [").unwrap();

        let err = ConfigLoader::with_path(&path).load(true).await.unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}

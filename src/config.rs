use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "draftdesk";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Budget for scrape jobs and saves that call out to third-party APIs.
    pub job_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 20,
            job_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    /// How long a settings confirmation stays on screen.
    pub message_clear_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            message_clear_secs: 3,
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }

    pub fn message_clear(&self) -> Duration {
        Duration::from_secs(self.message_clear_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn resolved_file(&self) -> Option<PathBuf> {
        self.file
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("draftdesk.log")))
    }
}

/// `<config_dir>/draftdesk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<data_dir>/draftdesk`
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

impl Config {
    /// Resolves the config to use. A file named with `--config` must exist;
    /// the default location may be absent, in which case defaults apply.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load_or_default(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Loads the config at `path`, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }

    /// Writes a default config to `path`. Refuses to clobber an existing file unless `force`.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Config file already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.ui.message_clear(), Duration::from_secs(3));
        assert_eq!(config.api.job_timeout_secs, 600);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.toml");
        let err = Config::resolve(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://drafts.example.com\"\n\n[ui]\nmessage_clear_secs = 5\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://drafts.example.com");
        assert_eq!(config.api.timeout_secs, 20);
        assert_eq!(config.ui.message_clear_secs, 5);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default().with_base_url(Some("http://10.0.0.2:9000".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");

        let config = Config::default().with_base_url(None);
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_default(&path, false).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        assert!(Config::write_default(&path, false).is_err());
        assert!(Config::write_default(&path, true).is_ok());
    }
}

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for assetpush
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// GitHub repository and authentication settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Where and how uploaded files are committed
    #[serde(default)]
    pub upload: UploadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    /// Repository owner (user or organization)
    pub owner: Option<String>,

    /// Repository name
    pub repo: Option<String>,

    /// Authentication method
    #[serde(default = "default_auth_method")]
    pub auth_method: String, // "auto", "config", "token", "gh_cli"

    /// Personal access token; read from the file but never written back
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Upload target configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Directory inside the repository; empty uploads to the repository root
    #[serde(default = "default_path")]
    pub path: String,

    /// Branch to commit to
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Commit message prefix; each file commit appends ": <filename>"
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Run the connection preflight before exporting
    #[serde(default = "default_true")]
    pub validate: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String, // "compact", "pretty", "full"

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_auth_method() -> String {
    "auto".to_string()
}
fn default_api_url() -> String {
    crate::github::DEFAULT_API_URL.to_string()
}
fn default_path() -> String {
    "assets".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_commit_message() -> String {
    "Upload assets from Penpot".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            auth_method: default_auth_method(),
            token: None,
            api_url: default_api_url(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            branch: default_branch(),
            commit_message: default_commit_message(),
            validate: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_values()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("assetpush").join("config.yml"))
    }

    /// Expand environment variables in values that commonly reference them
    pub fn expand_values(&mut self) -> Result<()> {
        if let Some(token) = &self.github.token {
            let expanded = shellexpand::env(token).context("Failed to expand github.token")?;
            self.github.token = Some(expanded.into_owned());
        }

        self.github.api_url = shellexpand::env(&self.github.api_url)
            .context("Failed to expand github.api_url")?
            .into_owned();

        Ok(())
    }
}

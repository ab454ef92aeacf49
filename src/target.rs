//! Per-run repository coordinates

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::info;

use crate::auth::resolve_token;
use crate::config::Config;
use crate::error::ConfigError;

/// Where one export run uploads to. Immutable for the duration of the run and never persisted.
#[derive(Clone)]
pub struct RepositoryTarget {
    pub owner: String,
    pub repo: String,
    /// Directory inside the repository, without leading or trailing slashes; empty means root
    pub path: String,
    pub branch: String,
    pub commit_message: String,
    token: SecretString,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct TargetOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
    pub commit_message: Option<String>,
    pub token: Option<String>,
}

impl RepositoryTarget {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: &str,
        branch: impl Into<String>,
        commit_message: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.trim_matches('/').to_string(),
            branch: branch.into(),
            commit_message: commit_message.into(),
            token: SecretString::new(token.into()),
        }
    }

    /// Build the target from config and overrides, failing on missing owner, repo or token
    pub fn resolve(config: &Config, overrides: &TargetOverrides) -> Result<Self, ConfigError> {
        let owner = non_empty(overrides.owner.as_ref().or(config.github.owner.as_ref()))
            .ok_or(ConfigError::MissingField("owner"))?;
        let repo = non_empty(overrides.repo.as_ref().or(config.github.repo.as_ref()))
            .ok_or(ConfigError::MissingField("repo"))?;

        let token = match non_empty(overrides.token.as_ref()) {
            Some(token) => token,
            None => {
                let (strategy, token) =
                    resolve_token(&config.github)?.ok_or(ConfigError::MissingField("token"))?;
                info!("Using authentication strategy: {:?}", strategy);
                token
            }
        };

        let path = overrides.path.as_deref().unwrap_or(&config.upload.path);
        let branch = non_empty(overrides.branch.as_ref())
            .or_else(|| non_empty(Some(&config.upload.branch)))
            .unwrap_or_else(|| "main".to_string());
        let commit_message = non_empty(overrides.commit_message.as_ref())
            .or_else(|| non_empty(Some(&config.upload.commit_message)))
            .unwrap_or_else(|| "Upload assets from Penpot".to_string());

        Ok(Self::new(owner, repo, path, branch, commit_message, token))
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Repository path for an uploaded file: `path/filename`, or `filename` at the root
    pub fn file_path(&self, filename: &str) -> String {
        if self.path.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.path, filename)
        }
    }

    /// Commit message for one uploaded file
    pub fn commit_message_for(&self, filename: &str) -> String {
        format!("{}: {}", self.commit_message, filename)
    }
}

impl fmt::Debug for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryTarget")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("commit_message", &self.commit_message)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(owner: Option<&str>, repo: Option<&str>, token: Option<&str>) -> Config {
        let mut config = Config::default();
        config.github.owner = owner.map(str::to_string);
        config.github.repo = repo.map(str::to_string);
        config.github.token = token.map(str::to_string);
        config.github.auth_method = "config".to_string();
        config
    }

    #[test]
    fn test_resolve_with_defaults() {
        let config = config_with(Some("octo"), Some("icons"), Some("ghp_x"));
        let target = RepositoryTarget::resolve(&config, &TargetOverrides::default()).unwrap();

        assert_eq!(target.full_name(), "octo/icons");
        assert_eq!(target.path, "assets");
        assert_eq!(target.branch, "main");
        assert_eq!(target.commit_message, "Upload assets from Penpot");
        assert_eq!(target.token(), "ghp_x");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = config_with(Some("octo"), Some("icons"), Some("ghp_x"));
        let overrides = TargetOverrides {
            repo: Some("logos".to_string()),
            path: Some("/static/img/".to_string()),
            branch: Some("develop".to_string()),
            token: Some("ghp_cli".to_string()),
            ..TargetOverrides::default()
        };
        let target = RepositoryTarget::resolve(&config, &overrides).unwrap();

        assert_eq!(target.repo, "logos");
        assert_eq!(target.path, "static/img");
        assert_eq!(target.branch, "develop");
        assert_eq!(target.token(), "ghp_cli");
    }

    #[test]
    fn test_missing_owner() {
        let config = config_with(None, Some("icons"), Some("ghp_x"));
        let err = RepositoryTarget::resolve(&config, &TargetOverrides::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("owner"));
    }

    #[test]
    fn test_blank_repo_is_missing() {
        let config = config_with(Some("octo"), Some("  "), Some("ghp_x"));
        let err = RepositoryTarget::resolve(&config, &TargetOverrides::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("repo"));
    }

    #[test]
    fn test_missing_token() {
        let config = config_with(Some("octo"), Some("icons"), None);
        let err = RepositoryTarget::resolve(&config, &TargetOverrides::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingField("token"));
    }

    #[test]
    fn test_file_path_joins_base() {
        let target = RepositoryTarget::new("o", "r", "assets", "main", "msg", "t");
        assert_eq!(target.file_path("a.png"), "assets/a.png");

        let root = RepositoryTarget::new("o", "r", "", "main", "msg", "t");
        assert_eq!(root.file_path("a.png"), "a.png");
    }

    #[test]
    fn test_commit_message_names_file() {
        let target = RepositoryTarget::new("o", "r", "assets", "main", "Upload assets", "t");
        assert_eq!(target.commit_message_for("a.png"), "Upload assets: a.png");
    }

    #[test]
    fn test_debug_redacts_token() {
        let target = RepositoryTarget::new("o", "r", "assets", "main", "msg", "ghp_secret");
        let debug = format!("{:?}", target);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("REDACTED"));
    }
}

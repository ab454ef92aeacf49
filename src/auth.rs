//! GitHub token discovery

use anyhow::{anyhow, Context, Result};
use std::env;
use std::process::Command;
use tracing::{debug, warn};

use crate::config::GitHubConfig;
use crate::error::ConfigError;

/// Where the token for a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// `github.token` in the config file or `--token`
    ConfigToken,
    /// `GITHUB_TOKEN` environment variable
    EnvironmentToken,
    /// `gh auth token`
    GitHubCLI,
}

/// Resolve the token according to `github.auth_method`.
///
/// Returns `Ok(None)` when the chosen method finds nothing; the caller reports
/// the missing field.
pub fn resolve_token(github: &GitHubConfig) -> Result<Option<(AuthStrategy, String)>, ConfigError> {
    let from_config = || {
        github
            .token
            .as_ref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| (AuthStrategy::ConfigToken, t.trim().to_string()))
    };
    let from_env = || {
        try_environment_token()
            .map_err(|e| debug!("{:#}", e))
            .ok()
            .map(|t| (AuthStrategy::EnvironmentToken, t))
    };
    let from_cli = || {
        try_github_cli()
            .map_err(|e| debug!("{:#}", e))
            .ok()
            .map(|t| (AuthStrategy::GitHubCLI, t))
    };

    match github.auth_method.as_str() {
        "auto" => Ok(from_config().or_else(from_env).or_else(from_cli)),
        "config" => Ok(from_config()),
        "token" => Ok(from_env()),
        "gh_cli" => Ok(from_cli()),
        other => Err(ConfigError::UnknownAuthMethod(other.to_string())),
    }
}

/// Try to get token from environment variable
fn try_environment_token() -> Result<String> {
    debug!("Attempting environment variable authentication");

    let token = env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;
    let token = token.trim().to_string();

    if token.is_empty() {
        return Err(anyhow!("GITHUB_TOKEN is empty"));
    }

    if !token.starts_with("ghp_")
        && !token.starts_with("gho_")
        && !token.starts_with("ghs_")
        && !token.starts_with("github_pat_")
    {
        warn!("GITHUB_TOKEN doesn't look like a GitHub token (expected ghp_, gho_, ghs_ or github_pat_ prefix)");
    }

    Ok(token)
}

/// Try to get token from GitHub CLI
fn try_github_cli() -> Result<String> {
    debug!("Attempting GitHub CLI authentication");

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("GitHub CLI (gh) is not installed")?;

    if !output.status.success() {
        return Err(anyhow!(
            "Failed to retrieve token from GitHub CLI: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    let token = String::from_utf8(output.stdout)
        .context("GitHub CLI token is not valid UTF-8")?
        .trim()
        .to_string();

    if token.is_empty() {
        return Err(anyhow!("GitHub CLI returned empty token"));
    }

    debug!("Successfully obtained token from GitHub CLI");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn github_with(method: &str, token: Option<&str>) -> GitHubConfig {
        GitHubConfig {
            auth_method: method.to_string(),
            token: token.map(str::to_string),
            ..GitHubConfig::default()
        }
    }

    #[test]
    fn test_config_token_wins_in_auto() {
        let resolved = resolve_token(&github_with("auto", Some(" ghp_abc "))).unwrap();
        assert_eq!(resolved, Some((AuthStrategy::ConfigToken, "ghp_abc".to_string())));
    }

    #[test]
    #[serial]
    fn test_environment_token() {
        env::set_var("GITHUB_TOKEN", "ghp_env");
        let resolved = resolve_token(&github_with("token", Some("ghp_ignored"))).unwrap();
        env::remove_var("GITHUB_TOKEN");

        assert_eq!(resolved, Some((AuthStrategy::EnvironmentToken, "ghp_env".to_string())));
    }

    #[test]
    #[serial]
    fn test_blank_environment_token_is_missing() {
        env::set_var("GITHUB_TOKEN", "   ");
        let resolved = resolve_token(&github_with("token", None)).unwrap();
        env::remove_var("GITHUB_TOKEN");

        assert!(resolved.is_none());
    }

    #[test]
    fn test_config_method_ignores_blank_token() {
        assert!(resolve_token(&github_with("config", Some(""))).unwrap().is_none());
    }

    #[test]
    fn test_unknown_method() {
        let err = resolve_token(&github_with("oauth", None)).unwrap_err();
        assert_eq!(err, ConfigError::UnknownAuthMethod("oauth".to_string()));
    }
}

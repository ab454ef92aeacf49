//! Connection preflight
//!
//! Four read-only probes, each short-circuiting on failure, decide whether an upload
//! attempt is worth making before any export work starts.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::github::GitHubClient;

/// Result of a preflight; discarded once the go/no-go decision is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// The first failing preflight check
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid token: GitHub rejected the credentials")]
    InvalidToken,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(u16),

    #[error("Repository {0} not found or not accessible")]
    RepositoryNotFound(String),

    #[error("Repository check failed: {0}")]
    RepositoryCheckFailed(u16),

    #[error("Branch '{0}' not found")]
    BranchNotFound(String),

    #[error("Branch check failed: {0}")]
    BranchCheckFailed(u16),

    #[error("Token lacks write access to {0}")]
    NoWriteAccess(String),

    #[error("Connection test failed: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for ValidationError {
    fn from(e: reqwest::Error) -> Self {
        ValidationError::Connection(e.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RepositoryMetadata {
    permissions: Option<Permissions>,
}

#[derive(Debug, Deserialize)]
struct Permissions {
    push: Option<bool>,
}

/// Runs the preflight sequence against one client's target
pub struct ConnectionValidator<'a> {
    client: &'a GitHubClient,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Run all checks; the first failure's message is returned verbatim
    pub async fn validate(&self) -> ValidationOutcome {
        match self.run_checks().await {
            Ok(()) => {
                info!(
                    "Connection to {} ({}) validated",
                    self.client.target().full_name(),
                    self.client.target().branch
                );
                ValidationOutcome::valid()
            }
            Err(e) => {
                info!("Connection validation failed: {}", e);
                ValidationOutcome::invalid(e.to_string())
            }
        }
    }

    async fn run_checks(&self) -> Result<(), ValidationError> {
        let target = self.client.target();

        debug!("Checking token");
        let user = self.client.current_user().await?;
        let status = user.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ValidationError::InvalidToken);
        } else if !status.is_success() {
            return Err(ValidationError::AuthenticationFailed(status.as_u16()));
        }

        debug!("Checking repository {}", target.full_name());
        let repo = self.client.repository().await?;
        let status = repo.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ValidationError::RepositoryNotFound(target.full_name()));
        } else if !status.is_success() {
            return Err(ValidationError::RepositoryCheckFailed(status.as_u16()));
        }
        let metadata = repo.json::<RepositoryMetadata>().await.unwrap_or_default();

        debug!("Checking branch {}", target.branch);
        let branch = self.client.branch().await?;
        let status = branch.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ValidationError::BranchNotFound(target.branch.clone()));
        } else if !status.is_success() {
            return Err(ValidationError::BranchCheckFailed(status.as_u16()));
        }

        if let Some(Permissions { push: Some(false) }) = metadata.permissions {
            return Err(ValidationError::NoWriteAccess(target.full_name()));
        }

        Ok(())
    }
}

//! Network capability seam
//!
//! Whichever execution context can reach GitHub implements [`RepositoryGateway`]; the
//! UI frame and the upload orchestrator only ever talk to this trait.

use async_trait::async_trait;

use crate::validator::ValidationOutcome;

/// A single file commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutFileRequest {
    /// Repository path, already joined with the base directory
    pub path: String,
    /// Base64 text
    pub content: String,
    pub message: String,
    /// Blob SHA of the current file, turning the create into an update
    pub sha: Option<String>,
}

/// Repository access needed by one export-and-upload run
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Read-only connection checks; must not mutate repository state
    async fn preflight(&self) -> ValidationOutcome;

    /// Current content hash at `path`, `None` when absent or unknown
    async fn existing_sha(&self, path: &str) -> Option<String>;

    /// Commit one file; the error is user-facing text
    async fn put_file(&self, request: &PutFileRequest) -> Result<(), String>;
}

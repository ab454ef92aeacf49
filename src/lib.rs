//! assetpush - Export design assets and upload them to GitHub
//!
//! Design elements tagged with export profiles are rendered by a design host, base64
//! encoded, and committed one file at a time through the GitHub contents API.
//!
//! ## Core Features
//!
//! - **Preflight**: token, repository, branch and write-access checks before any export
//! - **Typed messaging**: closed message enums between the design host and the UI frame
//! - **Fail-fast upload**: sequential commits that stop at the first failure
//! - **ZIP exports**: bulk exports from the design tool are extracted in-process
//!
//! ## Modules
//!
//! - [`config`]: Configuration management and parsing
//! - [`github`]: GitHub contents API client
//! - [`validator`]: Connection preflight
//! - [`host`]: Design host capability and service loop
//! - [`frame`]: UI frame run driver

pub mod archive;
pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod frame;
pub mod gateway;
pub mod github;
pub mod host;
pub mod messages;
pub mod messenger;
pub mod model;
pub mod progress;
pub mod sanitize;
pub mod target;
pub mod upload;
pub mod validator;

pub use config::Config;
pub use export::{ExportOrchestrator, ExportOutcome, ExportPhase};
pub use frame::{RunOutcome, UiFrame};
pub use gateway::{PutFileRequest, RepositoryGateway};
pub use github::GitHubClient;
pub use host::{ArchiveHost, DesignHost, DirectoryHost};
pub use target::{RepositoryTarget, TargetOverrides};
pub use upload::{UploadOrchestrator, UploadOutcome, UploadSummary};
pub use validator::{ConnectionValidator, ValidationOutcome};

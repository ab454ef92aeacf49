//! Error types shared across the export and upload pipeline

use thiserror::Error;

/// Problems with the run configuration, caught before any network activity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please fill in all required fields (missing: {0})")]
    MissingField(&'static str),

    #[error("Unknown auth method: {0}")]
    UnknownAuthMethod(String),
}

/// Failures building the GitHub client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL {url}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL cannot carry a path: {0}")]
    NotABaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures reported by a design host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("No active page")]
    NoActivePage,

    #[error("Element {element} has no {format} export")]
    Unsupported { element: String, format: String },

    #[error("Export failed for {element}: {message}")]
    Export { element: String, message: String },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that end an export run in the `failed` state
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No active page found")]
    NoActivePage,

    #[error("Failed to enumerate exportable elements: {0}")]
    Discovery(#[source] HostError),
}

/// ZIP extraction failures
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to read archive entry {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive entry escapes the archive root: {0}")]
    UnsafePath(String),

    #[error("Archive exceeds maximum entry count ({0})")]
    TooManyEntries(usize),

    #[error("Archive exceeds maximum extracted size ({0} bytes)")]
    TooLarge(u64),
}

/// Infrastructure failures of a full export-and-upload cycle
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Plugin host disconnected before the export finished")]
    HostDisconnected,
}

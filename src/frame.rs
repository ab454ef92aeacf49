//! UI frame side of the plugin
//!
//! Owns the network capability: preflights the connection, asks the host to export,
//! relays host progress, and uploads whatever the host delivers.

use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::gateway::RepositoryGateway;
use crate::messages::{HostMessage, Theme, UiMessage};
use crate::messenger::UiEndpoint;
use crate::progress::ProgressReporter;
use crate::target::RepositoryTarget;
use crate::upload::{UploadOrchestrator, UploadOutcome, UploadSummary};

/// How one export-and-upload cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Preflight rejected the connection; nothing was exported
    ValidationFailed(String),
    /// No element on the page carries an export profile
    NoAssets,
    /// The host could not export
    ExportFailed(String),
    /// The host delivered an empty file set
    NothingToUpload,
    Uploaded(UploadSummary),
}

/// Per-run context plus the UI side of the channel
pub struct UiFrame<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
    target: &'a RepositoryTarget,
    endpoint: UiEndpoint,
    progress: ProgressReporter,
    validate: bool,
    theme: Theme,
}

impl<'a, G: RepositoryGateway + ?Sized> UiFrame<'a, G> {
    pub fn new(
        gateway: &'a G,
        target: &'a RepositoryTarget,
        endpoint: UiEndpoint,
        progress: ProgressReporter,
    ) -> Self {
        Self {
            gateway,
            target,
            endpoint,
            progress,
            validate: true,
            theme: Theme::default(),
        }
    }

    /// Skip the connection preflight
    pub fn skip_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Run one full cycle. Not reentrant: one run at a time per frame.
    pub async fn run(&mut self) -> Result<RunOutcome, RunError> {
        self.progress.reset();
        if self.validate {
            self.progress.report(0.0, "Testing connection...");
            let outcome = self.gateway.preflight().await;
            if !outcome.valid {
                let error = outcome
                    .error
                    .unwrap_or_else(|| "Connection test failed".to_string());
                return Ok(RunOutcome::ValidationFailed(error));
            }
        }

        self.progress.report(0.0, "Initializing...");
        if !self.endpoint.send(UiMessage::StartExport) {
            return Err(RunError::HostDisconnected);
        }

        loop {
            let incoming = self
                .endpoint
                .recv()
                .await
                .ok_or(RunError::HostDisconnected)?;

            match incoming {
                HostMessage::ExportProgress { percent, message } => {
                    self.progress.report(percent, message);
                }
                HostMessage::ExportStatus { .. } => self.progress.emit(incoming),
                HostMessage::ThemeChange { theme } => {
                    debug!("Theme changed to {:?}", theme);
                    self.theme = theme;
                }
                HostMessage::NoAssets => return Ok(RunOutcome::NoAssets),
                HostMessage::ExportComplete { success, error, .. } => {
                    if success {
                        warn!("Unexpected successful completion from host without assets");
                        return Ok(RunOutcome::NothingToUpload);
                    }
                    return Ok(RunOutcome::ExportFailed(
                        error.unwrap_or_else(|| "Export failed".to_string()),
                    ));
                }
                HostMessage::AssetsReady { assets } => {
                    info!("Host delivered {} files", assets.len());
                    let uploader = UploadOrchestrator::new(self.gateway, self.target);
                    return Ok(match uploader.upload_all(&assets, &mut self.progress).await {
                        UploadOutcome::NothingToUpload => RunOutcome::NothingToUpload,
                        UploadOutcome::Finished(summary) => RunOutcome::Uploaded(summary),
                    });
                }
            }
        }
    }

    /// Tell the host to stop its service loop
    pub fn close(self) {
        self.endpoint.send(UiMessage::Shutdown);
    }
}

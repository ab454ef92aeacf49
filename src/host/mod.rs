//! Design host side of the plugin
//!
//! The host owns the design document and its native export capability. It never talks
//! to the network: it exports, encodes and hands the result to the UI frame.

pub mod files;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::HostError;
use crate::export::{ExportOrchestrator, ExportOutcome};
use crate::messages::{HostMessage, Theme, UiMessage};
use crate::messenger::HostEndpoint;
use crate::model::{ExportProfile, ExportableElement};
use crate::progress::ProgressReporter;

pub use files::{ArchiveHost, DirectoryHost};

/// Native capabilities of a design tool
#[async_trait]
pub trait DesignHost: Send + Sync {
    /// Every element on the active page, with or without export profiles.
    /// Fails with [`HostError::NoActivePage`] when there is nothing to enumerate.
    async fn elements(&self) -> Result<Vec<ExportableElement>, HostError>;

    /// Render one element with one profile
    async fn export(
        &self,
        element: &ExportableElement,
        profile: &ExportProfile,
    ) -> Result<Vec<u8>, HostError>;
}

/// Process UI messages one at a time until `Shutdown` or until the UI frame goes away
pub async fn serve<H: DesignHost + ?Sized>(host: &H, mut endpoint: HostEndpoint) {
    while let Some(message) = endpoint.recv().await {
        match message {
            UiMessage::StartExport => {
                info!("Export requested");
                let mut progress = ProgressReporter::to_channel(endpoint.sender());
                let reply = match ExportOrchestrator::new(host).run(&mut progress).await {
                    Ok(ExportOutcome::Ready(assets)) => HostMessage::AssetsReady { assets },
                    Ok(ExportOutcome::NoAssets) => HostMessage::NoAssets,
                    Err(e) => HostMessage::failed(e.to_string()),
                };
                if !endpoint.send(reply) {
                    debug!("UI frame closed before the export result was delivered");
                    break;
                }
            }
            UiMessage::Shutdown => {
                debug!("Host shutting down");
                break;
            }
        }
    }
}

/// Forward a design-tool theme change to the UI frame
pub fn notify_theme(endpoint: &HostEndpoint, theme: Theme) -> bool {
    endpoint.send(HostMessage::ThemeChange { theme })
}

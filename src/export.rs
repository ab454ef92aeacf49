//! Export Orchestrator - host-side discovery, export and encoding
//!
//! Runs linearly through `Discovering → Exporting → Encoding → Delivered`, or ends in
//! `Failed`. A single profile's export failure is logged and skipped: partial success
//! is a normal outcome.

use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{ExportError, HostError};
use crate::host::DesignHost;
use crate::messages::{HostMessage, StatusLevel};
use crate::model::{EncodedAsset, ExportProfile, ExportableElement};
use crate::progress::ProgressReporter;

const DISCOVERY_START: f64 = 5.0;
const EXPORT_START: f64 = 10.0;
const EXPORT_SPAN: f64 = 38.0;
const ENCODE_START: f64 = 48.0;
const ENCODE_END: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Discovering,
    Exporting,
    Encoding,
    Delivered,
    Failed,
}

/// Terminal result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No element carries an export profile, or every export failed
    NoAssets,
    /// Encoded files in enumeration order
    Ready(Vec<EncodedAsset>),
}

struct RawExport {
    filename: String,
    bytes: Vec<u8>,
}

pub struct ExportOrchestrator<'a, H: DesignHost + ?Sized> {
    host: &'a H,
    phase: ExportPhase,
}

impl<'a, H: DesignHost + ?Sized> ExportOrchestrator<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            phase: ExportPhase::Idle,
        }
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    fn enter(&mut self, phase: ExportPhase) {
        debug!("Export phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Run one export; progress is reported after every attempted (element, profile) pair
    pub async fn run(
        &mut self,
        progress: &mut ProgressReporter,
    ) -> Result<ExportOutcome, ExportError> {
        self.enter(ExportPhase::Discovering);
        progress.report(DISCOVERY_START, "Finding exportable elements...");

        let elements = match self.discover().await {
            Ok(elements) => elements,
            Err(e) => {
                self.enter(ExportPhase::Failed);
                progress.emit(HostMessage::status(StatusLevel::Error, e.to_string()));
                return Err(e);
            }
        };

        if elements.is_empty() {
            info!("No elements with export profiles found");
            self.enter(ExportPhase::Delivered);
            return Ok(ExportOutcome::NoAssets);
        }

        progress.report(
            EXPORT_START,
            format!("Found {} elements with export profiles", elements.len()),
        );
        progress.emit(HostMessage::status(
            StatusLevel::Info,
            format!("Found {} elements to export", elements.len()),
        ));

        self.enter(ExportPhase::Exporting);
        let raw = self.export_all(&elements, progress).await;

        self.enter(ExportPhase::Encoding);
        progress.report(ENCODE_START, format!("Encoding {} files...", raw.len()));
        let assets: Vec<EncodedAsset> = raw
            .into_iter()
            .map(|export| EncodedAsset {
                filename: export.filename,
                content: codec::encode(&export.bytes),
            })
            .collect();

        self.enter(ExportPhase::Delivered);
        if assets.is_empty() {
            warn!("Every export failed; nothing to deliver");
            return Ok(ExportOutcome::NoAssets);
        }

        progress.report(ENCODE_END, format!("Prepared {} files", assets.len()));
        info!("Export produced {} files", assets.len());
        Ok(ExportOutcome::Ready(assets))
    }

    async fn discover(&self) -> Result<Vec<ExportableElement>, ExportError> {
        let elements = self.host.elements().await.map_err(|e| match e {
            HostError::NoActivePage => ExportError::NoActivePage,
            other => ExportError::Discovery(other),
        })?;

        let total = elements.len();
        let exportable: Vec<ExportableElement> = elements
            .into_iter()
            .filter(|element| !element.profiles.is_empty())
            .collect();
        debug!("{} of {} elements carry export profiles", exportable.len(), total);

        Ok(exportable)
    }

    async fn export_all(
        &self,
        elements: &[ExportableElement],
        progress: &mut ProgressReporter,
    ) -> Vec<RawExport> {
        let pairs: Vec<(&ExportableElement, &ExportProfile)> = elements
            .iter()
            .flat_map(|element| element.profiles.iter().map(move |profile| (element, profile)))
            .collect();
        let total = pairs.len();

        let mut raw = Vec::with_capacity(total);
        for (attempted, (element, profile)) in pairs.into_iter().enumerate() {
            let filename = profile.file_name(&element.name);

            match self.host.export(element, profile).await {
                Ok(bytes) => {
                    debug!("Exported {} ({} bytes)", filename, bytes.len());
                    raw.push(RawExport { filename, bytes });
                }
                Err(e) => warn!("Skipping {}: {}", filename, e),
            }

            let done = attempted + 1;
            progress.report(
                EXPORT_START + (done as f64 / total as f64) * EXPORT_SPAN,
                format!("Exported {}/{}: {}", done, total, element.name),
            );
        }

        raw
    }
}

//! Upload Orchestrator - sequential, fail-fast file commits
//!
//! Files are committed one at a time in the order received. The first failure stops
//! the batch: earlier results are kept, later files are never attempted.

use tracing::{debug, error, info};

use crate::gateway::{PutFileRequest, RepositoryGateway};
use crate::model::{EncodedAsset, UploadResult};
use crate::progress::ProgressReporter;
use crate::target::RepositoryTarget;

const UPLOAD_START: f64 = 55.0;
const UPLOAD_SPAN: f64 = 40.0;

/// Results of one upload batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// One entry per attempted file, in attempt order
    pub results: Vec<UploadResult>,
    /// Number of files handed to the orchestrator
    pub total: usize,
    /// True only when every file was attempted and succeeded
    pub success: bool,
}

impl UploadSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Files never attempted because of an earlier failure
    pub fn skipped(&self) -> usize {
        self.total - self.results.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    NothingToUpload,
    Finished(UploadSummary),
}

pub struct UploadOrchestrator<'a, G: RepositoryGateway + ?Sized> {
    gateway: &'a G,
    target: &'a RepositoryTarget,
}

impl<'a, G: RepositoryGateway + ?Sized> UploadOrchestrator<'a, G> {
    pub fn new(gateway: &'a G, target: &'a RepositoryTarget) -> Self {
        Self { gateway, target }
    }

    pub async fn upload_all(
        &self,
        assets: &[EncodedAsset],
        progress: &mut ProgressReporter,
    ) -> UploadOutcome {
        if assets.is_empty() {
            info!("No files to upload");
            return UploadOutcome::NothingToUpload;
        }

        let total = assets.len();
        progress.report(UPLOAD_START, "Uploading to GitHub...");
        info!(
            "Uploading {} files to {} ({})",
            total,
            self.target.full_name(),
            self.target.branch
        );

        let mut results = Vec::with_capacity(total);
        for (index, asset) in assets.iter().enumerate() {
            let result = self.upload_one(asset).await;
            let failed = !result.success;
            results.push(result);

            let completed = index + 1;
            progress.report(
                UPLOAD_START + (completed as f64 / total as f64) * UPLOAD_SPAN,
                format!("Uploading {}/{}: {}", completed, total, asset.filename),
            );

            if failed {
                error!(
                    "Stopping after failed upload of {}; {} files not attempted",
                    asset.filename,
                    total - completed
                );
                return UploadOutcome::Finished(UploadSummary {
                    results,
                    total,
                    success: false,
                });
            }
        }

        progress.report(100.0, "Upload complete!");
        UploadOutcome::Finished(UploadSummary {
            results,
            total,
            success: true,
        })
    }

    async fn upload_one(&self, asset: &EncodedAsset) -> UploadResult {
        let path = self.target.file_path(&asset.filename);
        let sha = self.gateway.existing_sha(&path).await;
        debug!(
            "{} {}",
            if sha.is_some() { "Updating" } else { "Creating" },
            path
        );

        let request = PutFileRequest {
            path: path.clone(),
            content: asset.content.clone(),
            message: self.target.commit_message_for(&asset.filename),
            sha,
        };

        match self.gateway.put_file(&request).await {
            Ok(()) => {
                info!("Uploaded {}", path);
                UploadResult::succeeded(path)
            }
            Err(e) => {
                error!("Upload of {} failed: {}", path, e);
                UploadResult::failed(path, e)
            }
        }
    }
}

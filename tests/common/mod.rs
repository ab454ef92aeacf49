//! Common test utilities and helpers for assetpush tests
#![allow(dead_code)]

use assetpush::error::HostError;
use assetpush::messages::HostMessage;
use assetpush::model::{EncodedAsset, ExportFormat, ExportProfile, ExportableElement};
use assetpush::progress::ProgressReporter;
use assetpush::{DesignHost, PutFileRequest, RepositoryGateway, RepositoryTarget, ValidationOutcome};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "ghp_test_token";

pub fn target() -> RepositoryTarget {
    RepositoryTarget::new("octo", "icons", "assets", "main", "Upload assets", TOKEN)
}

pub fn asset(filename: &str) -> EncodedAsset {
    EncodedAsset {
        filename: filename.to_string(),
        content: assetpush::codec::encode(filename.as_bytes()),
    }
}

pub fn element(name: &str, profiles: Vec<ExportProfile>) -> ExportableElement {
    ExportableElement {
        id: format!("id-{}", name),
        name: name.to_string(),
        profiles,
    }
}

pub fn png(scale: f64, suffix: &str) -> ExportProfile {
    ExportProfile::new(ExportFormat::Png, scale, suffix)
}

/// Progress reporter that records every message it is given
pub fn recording_reporter() -> (ProgressReporter, Arc<Mutex<Vec<HostMessage>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let reporter = ProgressReporter::new(move |m| sink.lock().unwrap().push(m));
    (reporter, seen)
}

pub fn percents(seen: &Arc<Mutex<Vec<HostMessage>>>) -> Vec<f64> {
    percents_of(&seen.lock().unwrap())
}

pub fn percents_of(messages: &[HostMessage]) -> Vec<f64> {
    messages
        .iter()
        .filter_map(|m| match m {
            HostMessage::ExportProgress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

pub fn assert_monotonic(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "Progress went backwards: {} -> {} in {:?}",
            pair[0],
            pair[1],
            values
        );
    }
}

/// Design host with a fixed element list; exports return the file name as bytes
pub struct FakeHost {
    pub elements: Vec<ExportableElement>,
    pub no_active_page: bool,
    pub failing: HashSet<String>,
    pub exported: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new(elements: Vec<ExportableElement>) -> Self {
        Self {
            elements,
            no_active_page: false,
            failing: HashSet::new(),
            exported: Mutex::new(Vec::new()),
        }
    }

    pub fn without_page() -> Self {
        Self {
            no_active_page: true,
            ..Self::new(Vec::new())
        }
    }

    /// Make the export of this output file name fail
    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_string());
        self
    }
}

#[async_trait]
impl DesignHost for FakeHost {
    async fn elements(&self) -> Result<Vec<ExportableElement>, HostError> {
        if self.no_active_page {
            return Err(HostError::NoActivePage);
        }
        Ok(self.elements.clone())
    }

    async fn export(
        &self,
        element: &ExportableElement,
        profile: &ExportProfile,
    ) -> Result<Vec<u8>, HostError> {
        let filename = profile.file_name(&element.name);
        self.exported.lock().unwrap().push(filename.clone());
        if self.failing.contains(&filename) {
            return Err(HostError::Export {
                element: element.name.clone(),
                message: "renderer crashed".to_string(),
            });
        }
        Ok(filename.into_bytes())
    }
}

/// Gateway that records calls and fails uploads of one chosen path
pub struct RecordingGateway {
    pub preflight: ValidationOutcome,
    pub fail_path: Option<String>,
    pub preflights: AtomicUsize,
    pub puts: Mutex<Vec<PutFileRequest>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            preflight: ValidationOutcome::valid(),
            fail_path: None,
            preflights: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(error: &str) -> Self {
        Self {
            preflight: ValidationOutcome::invalid(error),
            ..Self::new()
        }
    }

    pub fn failing_on(mut self, path: &str) -> Self {
        self.fail_path = Some(path.to_string());
        self
    }

    pub fn put_paths(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|p| p.path.clone()).collect()
    }

    pub fn preflight_count(&self) -> usize {
        self.preflights.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryGateway for RecordingGateway {
    async fn preflight(&self) -> ValidationOutcome {
        self.preflights.fetch_add(1, Ordering::SeqCst);
        self.preflight.clone()
    }

    async fn existing_sha(&self, _path: &str) -> Option<String> {
        None
    }

    async fn put_file(&self, request: &PutFileRequest) -> Result<(), String> {
        self.puts.lock().unwrap().push(request.clone());
        match &self.fail_path {
            Some(path) if *path == request.path => Err("Invalid request".to_string()),
            _ => Ok(()),
        }
    }
}

/// Assertion helpers for test validation
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}

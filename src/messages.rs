//! Messages exchanged between the design host and the UI frame
//!
//! Serialized as internally tagged JSON, so `HostMessage::ExportProgress` travels as
//! `{"type":"export-progress","percent":...,"message":...}`.

use serde::{Deserialize, Serialize};

use crate::model::{EncodedAsset, UploadResult};

/// UI frame → design host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiMessage {
    /// Begin one export run. Carries no repository configuration: the host never sees the token.
    StartExport,
    /// Stop the host service loop
    Shutdown,
}

/// Design host → UI frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    ExportProgress {
        percent: f64,
        message: String,
    },
    ExportStatus {
        message: String,
        status: StatusLevel,
    },
    ExportComplete {
        success: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        results: Vec<UploadResult>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    NoAssets,
    AssetsReady {
        assets: Vec<EncodedAsset>,
    },
    #[serde(rename = "themechange")]
    ThemeChange {
        theme: Theme,
    },
}

impl HostMessage {
    pub fn progress(percent: f64, message: impl Into<String>) -> Self {
        HostMessage::ExportProgress {
            percent,
            message: message.into(),
        }
    }

    pub fn status(status: StatusLevel, message: impl Into<String>) -> Self {
        HostMessage::ExportStatus {
            message: message.into(),
            status,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        HostMessage::ExportComplete {
            success: false,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

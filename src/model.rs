//! Data carried between the design host, the uploader and the presentation layer

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sanitize::sanitize;

/// Output format of one export profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Webp,
    Svg,
    Pdf,
}

impl ExportFormat {
    /// File extension written after the final `.`
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::Webp),
            "svg" => Some(ExportFormat::Svg),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One desired rendition of a design element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportProfile {
    pub format: ExportFormat,

    #[serde(default = "default_scale")]
    pub scale: f64,

    #[serde(default)]
    pub suffix: String,
}

fn default_scale() -> f64 {
    1.0
}

impl ExportProfile {
    pub fn new(format: ExportFormat, scale: f64, suffix: impl Into<String>) -> Self {
        Self {
            format,
            scale,
            suffix: suffix.into(),
        }
    }

    /// Output file name for an element rendered with this profile:
    /// `sanitize(name) + suffix + ("@{scale}x" unless scale is 1) + "." + extension`
    pub fn file_name(&self, element_name: &str) -> String {
        let scale = if self.scale == 1.0 {
            String::new()
        } else {
            format!("@{}x", self.scale)
        };
        format!(
            "{}{}{}.{}",
            sanitize(element_name),
            self.suffix,
            scale,
            self.format.extension()
        )
    }
}

/// Host-owned handle to a design node plus its export profiles
#[derive(Debug, Clone, PartialEq)]
pub struct ExportableElement {
    /// Opaque identifier, only meaningful to the host that produced it
    pub id: String,
    pub name: String,
    pub profiles: Vec<ExportProfile>,
}

/// One exported file ready for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAsset {
    pub filename: String,
    /// Base64 text
    pub content: String,
}

/// Outcome of one attempted upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_at_unit_scale() {
        let profile = ExportProfile::new(ExportFormat::Png, 1.0, "");
        assert_eq!(profile.file_name("My Shape!"), "my_shape_.png");
    }

    #[test]
    fn test_file_name_with_suffix_and_scale() {
        let profile = ExportProfile::new(ExportFormat::Png, 2.0, "-icon");
        assert_eq!(profile.file_name("My Shape!"), "my_shape_-icon@2x.png");
    }

    #[test]
    fn test_file_name_fractional_scale() {
        let profile = ExportProfile::new(ExportFormat::Webp, 1.5, "");
        assert_eq!(profile.file_name("hero"), "hero@1.5x.webp");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("JPEG"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("svg"), Some(ExportFormat::Svg));
        assert_eq!(ExportFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_profile_deserialize_defaults() {
        let profile: ExportProfile = serde_json::from_str(r#"{"format":"svg"}"#).unwrap();
        assert_eq!(profile.scale, 1.0);
        assert_eq!(profile.suffix, "");
    }

    #[test]
    fn test_upload_result_omits_missing_error() {
        let json = serde_json::to_string(&UploadResult::succeeded("assets/a.png")).unwrap();
        assert_eq!(json, r#"{"path":"assets/a.png","success":true}"#);
    }
}

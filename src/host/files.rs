//! Hosts backed by already-rendered files
//!
//! Both hosts treat each file as one element with a single profile read from its name:
//! `icon@2x.png` is element `icon` exported as PNG at scale 2.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

use super::DesignHost;
use crate::archive;
use crate::error::HostError;
use crate::model::{ExportFormat, ExportProfile, ExportableElement};

fn scale_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*)@(\d+(?:\.\d+)?)x$").expect("static regex"))
}

/// Derive an element from a rendered file name; unknown extensions get no profiles
pub fn element_from_file(id: impl Into<String>, file_name: &str) -> ExportableElement {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };

    let (name, scale) = match scale_suffix().captures(stem) {
        Some(caps) => {
            let scale = caps[2].parse::<f64>().ok().filter(|s| *s > 0.0);
            match scale {
                Some(scale) => (caps[1].to_string(), scale),
                None => (stem.to_string(), 1.0),
            }
        }
        None => (stem.to_string(), 1.0),
    };

    let profiles = extension
        .and_then(ExportFormat::from_extension)
        .map(|format| vec![ExportProfile::new(format, scale, "")])
        .unwrap_or_default();

    ExportableElement {
        id: id.into(),
        name,
        profiles,
    }
}

/// Check that a host is being asked for the rendition it actually holds
fn ensure_matches(element: &ExportableElement, profile: &ExportProfile) -> Result<(), HostError> {
    if element.profiles.iter().any(|p| p == profile) {
        Ok(())
    } else {
        Err(HostError::Unsupported {
            element: element.name.clone(),
            format: format!("{}@{}x", profile.format, profile.scale),
        })
    }
}

fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A ZIP archive produced by the design tool's bulk export
pub struct ArchiveHost {
    entries: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl ArchiveHost {
    pub fn from_bytes(zip_bytes: &[u8]) -> Result<Self, HostError> {
        let files = archive::extract(zip_bytes)?;
        info!("Archive contains {} files", files.len());

        let entries: Vec<(String, Vec<u8>)> =
            files.into_iter().map(|f| (f.path, f.data)).collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (path, _))| (path.clone(), i))
            .collect();

        Ok(Self { entries, index })
    }

    pub async fn open(path: &Path) -> Result<Self, HostError> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes)
    }
}

#[async_trait]
impl DesignHost for ArchiveHost {
    async fn elements(&self) -> Result<Vec<ExportableElement>, HostError> {
        Ok(self
            .entries
            .iter()
            .map(|(path, _)| element_from_file(path.clone(), file_name_of(path)))
            .collect())
    }

    async fn export(
        &self,
        element: &ExportableElement,
        profile: &ExportProfile,
    ) -> Result<Vec<u8>, HostError> {
        ensure_matches(element, profile)?;
        let index = self.index.get(&element.id).ok_or_else(|| HostError::Export {
            element: element.name.clone(),
            message: format!("{} is not in the archive", element.id),
        })?;
        Ok(self.entries[*index].1.clone())
    }
}

/// A directory of rendered files (non-recursive, sorted by file name)
pub struct DirectoryHost {
    root: PathBuf,
}

impl DirectoryHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DesignHost for DirectoryHost {
    async fn elements(&self) -> Result<Vec<ExportableElement>, HostError> {
        if !self.root.is_dir() {
            return Err(HostError::NoActivePage);
        }

        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        debug!("{} files in {:?}", names.len(), self.root);

        Ok(names
            .iter()
            .map(|name| element_from_file(name.clone(), name))
            .collect())
    }

    async fn export(
        &self,
        element: &ExportableElement,
        profile: &ExportProfile,
    ) -> Result<Vec<u8>, HostError> {
        ensure_matches(element, profile)?;
        Ok(tokio::fs::read(self.root.join(&element.id)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_from_plain_name() {
        let element = element_from_file("a", "Logo.svg");
        assert_eq!(element.name, "Logo");
        assert_eq!(
            element.profiles,
            vec![ExportProfile::new(ExportFormat::Svg, 1.0, "")]
        );
    }

    #[test]
    fn test_element_from_scaled_name() {
        let element = element_from_file("a", "icon@2x.png");
        assert_eq!(element.name, "icon");
        assert_eq!(element.profiles[0].scale, 2.0);
        assert_eq!(element.profiles[0].file_name(&element.name), "icon@2x.png");
    }

    #[test]
    fn test_element_from_fractional_scale() {
        let element = element_from_file("a", "hero@1.5x.jpg");
        assert_eq!(element.name, "hero");
        assert_eq!(element.profiles[0].scale, 1.5);
        assert_eq!(element.profiles[0].format, ExportFormat::Jpeg);
    }

    #[test]
    fn test_unknown_extension_has_no_profiles() {
        assert!(element_from_file("a", "notes.txt").profiles.is_empty());
        assert!(element_from_file("a", "README").profiles.is_empty());
        assert!(element_from_file("a", ".hidden").profiles.is_empty());
    }

    #[test]
    fn test_file_name_of_nested_path() {
        assert_eq!(file_name_of("icons/home.svg"), "home.svg");
        assert_eq!(file_name_of("home.svg"), "home.svg");
    }

    #[tokio::test]
    async fn test_directory_host_lists_sorted_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.svg"), b"<svg/>").unwrap();
        std::fs::write(dir.path().join("a@2x.png"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let host = DirectoryHost::new(dir.path());
        let elements = host.elements().await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id, "a@2x.png");
        assert_eq!(elements[1].id, "b.svg");

        let bytes = host
            .export(&elements[1], &elements[1].profiles[0])
            .await
            .unwrap();
        assert_eq!(bytes, b"<svg/>");
    }

    #[tokio::test]
    async fn test_directory_host_missing_root() {
        let host = DirectoryHost::new("/nonexistent/assetpush/dir");
        assert!(matches!(host.elements().await, Err(HostError::NoActivePage)));
    }

    #[tokio::test]
    async fn test_export_rejects_foreign_profile() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.svg"), b"<svg/>").unwrap();

        let host = DirectoryHost::new(dir.path());
        let elements = host.elements().await.unwrap();
        let png = ExportProfile::new(ExportFormat::Png, 1.0, "");
        assert!(matches!(
            host.export(&elements[0], &png).await,
            Err(HostError::Unsupported { .. })
        ));
    }
}

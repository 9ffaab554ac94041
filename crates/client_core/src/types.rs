use std::{fmt, path::Path, sync::Arc};

use anyhow::{Context, Result};

/// Images above this size are still accepted; the limit is advisory.
pub const ADVISORY_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guidance the picker shows but the form never enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryNote {
    NotAnImage,
    OverSizeLimit,
}

/// A file picked by the user, held in full until it is replaced or removed.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image file '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn looks_like_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn exceeds_advisory_size(&self) -> bool {
        self.len() > ADVISORY_MAX_IMAGE_BYTES
    }

    pub fn advisory_notes(&self) -> Vec<AdvisoryNote> {
        let mut notes = Vec::new();
        if !self.looks_like_image() {
            notes.push(AdvisoryNote::NotAnImage);
        }
        if self.exceeds_advisory_size() {
            notes.push(AdvisoryNote::OverSizeLimit);
        }
        notes
    }
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

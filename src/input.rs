//! Input intake: the source-file value type.
//!
//! A [`SourceFile`] is an opaque binary blob with an original filename and
//! a MIME-type hint. It is created at intake (manual selection, drag-drop,
//! CLI path, multipart upload), held in an ordered list, and never mutated.
//! Decoding happens later, in the pipeline — intake performs no validation,
//! so an undecodable blob only surfaces as a [`crate::FileError`] when a
//! conversion run reaches it.

use crate::error::ConvertError;
use std::path::Path;

/// An input file queued for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Original filename, used to derive the output name.
    pub name: String,
    /// MIME-type hint from the intake surface. Advisory only — the decoder
    /// sniffs the actual content.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl SourceFile {
    /// Wrap an in-memory blob.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_mime(&name).map(str::to_string);
        Self {
            name,
            content_type,
            data,
        }
    }

    /// Wrap an in-memory blob with an explicit MIME hint.
    pub fn with_content_type(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: Some(content_type.into()),
            data,
        }
    }

    /// Read a file from disk. The name is the final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| ConvertError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, data))
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Extension-based MIME guess for the common raster formats.
fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

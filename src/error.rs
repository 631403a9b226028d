//! Error types for the img2any library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the operation cannot produce a result at
//!   all (empty input, invalid request, archive assembly failure, or — under
//!   the fail-fast policy — any single file failing). Returned as
//!   `Err(ConvertError)` from the top-level entry points.
//!
//! * [`FileError`] — **Non-fatal**: one file could not be converted (not a
//!   decodable image, encoder rejected the surface) but the other files are
//!   fine. Under [`crate::config::FailurePolicy::BestEffort`] these are
//!   collected in [`crate::output::BatchOutput::failures`] so callers can
//!   inspect partial success instead of losing the whole batch.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first bad file, or log it and keep the rest.

use thiserror::Error;

/// All fatal errors returned by the img2any library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::BatchOutput`] rather than propagated here (except under
/// fail-fast, where the first one is wrapped in [`ConvertError::BatchFailed`]).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Conversion or packaging was invoked with zero files.
    #[error("No files to process. Add at least one input file.")]
    EmptyInput,

    /// Fail-fast policy: a single file failed, so the whole batch is
    /// discarded. `index` is the position in the intake list.
    #[error("Batch failed on '{name}' (file {index}): {source}")]
    BatchFailed {
        index: usize,
        name: String,
        #[source]
        source: FileError,
    },

    /// The requested output format string is not one of
    /// `png|jpeg|webp|pdf|svg`.
    #[error("Invalid format specified.")]
    InvalidFormat { given: String },

    /// Builder validation failed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// ZIP assembly failed.
    #[error("Failed to build archive: {0}")]
    Archive(String),

    /// Could not read an input or write an output file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error (task panic, runtime failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file.
///
/// Stored in [`crate::output::BatchOutput::failures`] when the best-effort
/// policy is active; wrapped in [`ConvertError::BatchFailed`] under
/// fail-fast. The overall batch continues (best-effort) unless every file
/// fails.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The blob could not be decoded as an image.
    #[error("'{name}' is not a readable image: {detail}")]
    DecodeFailed { name: String, detail: String },

    /// The target encoder rejected the surface.
    #[error("'{name}' could not be encoded as {format}: {detail}")]
    EncodeFailed {
        name: String,
        format: String,
        detail: String,
    },
}

impl FileError {
    /// The original filename the failure belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            FileError::DecodeFailed { name, .. } => name,
            FileError::EncodeFailed { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_failed_display_names_the_file() {
        let e = ConvertError::BatchFailed {
            index: 2,
            name: "cat.bmp".into(),
            source: FileError::DecodeFailed {
                name: "cat.bmp".into(),
                detail: "unknown magic".into(),
            },
        };
        let msg = e.to_string();
        assert!(msg.contains("cat.bmp"), "got: {msg}");
        assert!(msg.contains("file 2"), "got: {msg}");
    }

    #[test]
    fn invalid_format_matches_endpoint_contract() {
        let e = ConvertError::InvalidFormat {
            given: "tiff".into(),
        };
        assert_eq!(e.to_string(), "Invalid format specified.");
    }

    #[test]
    fn encode_failed_display() {
        let e = FileError::EncodeFailed {
            name: "photo.png".into(),
            format: "webp".into(),
            detail: "unsupported color type".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("photo.png"));
        assert!(msg.contains("webp"));
    }

    #[test]
    fn file_error_exposes_name() {
        let e = FileError::DecodeFailed {
            name: "a.png".into(),
            detail: "truncated".into(),
        };
        assert_eq!(e.file_name(), "a.png");
    }
}

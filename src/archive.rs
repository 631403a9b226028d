//! Archive packaging: bundle converted outputs into one ZIP for a
//! single-shot download.
//!
//! Entry names are the converted filenames verbatim — no path
//! sanitisation and no collision handling. Duplicate names are written as
//! separate entries; most extractors keep the last one, which is the
//! accepted limitation of the download-all flow.

use crate::error::ConvertError;
use crate::output::ConvertedFile;
use std::io::{Cursor, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundle all converted files into a deflate-compressed ZIP archive.
///
/// An empty list is reported as [`ConvertError::EmptyInput`], never as an
/// empty archive.
pub fn package_all(files: &[ConvertedFile]) -> Result<Vec<u8>, ConvertError> {
    if files.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer
            .start_file(&file.name, options)
            .map_err(|e| ConvertError::Archive(format!("'{}': {e}", file.name)))?;
        writer
            .write_all(&file.data)
            .map_err(|e| ConvertError::Archive(format!("'{}': {e}", file.name)))?;
        debug!("Archived '{}' ({} bytes)", file.name, file.data.len());
    }

    let cursor = writer
        .finish()
        .map_err(|e| ConvertError::Archive(e.to_string()))?;
    let bytes = cursor.into_inner();
    info!("Archive built: {} entries, {} bytes", files.len(), bytes.len());
    Ok(bytes)
}

//! Output types: converted files, batch results, and run statistics.

use crate::config::OutputFormat;
use crate::error::FileError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// The output of one pipeline execution.
///
/// Never mutated after creation: it is held in an ordered list, available
/// for single-file download (via [`ConvertedFile::data_url`] or the raw
/// bytes) and consumed by the archive packager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    /// Derived filename: original base name + new extension.
    pub name: String,
    /// MIME type of the payload.
    pub mime: String,
    /// Encoded payload bytes.
    pub data: Vec<u8>,
}

impl ConvertedFile {
    pub fn new(name: impl Into<String>, format: OutputFormat, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: format.mime_type().to_string(),
            data,
        }
    }

    /// The addressable-URI representation of the payload
    /// (`data:<mime>;base64,...`), suitable for direct download links and
    /// embedding.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Derive the output filename from the original.
///
/// Everything from the FIRST `.` onward is stripped, then the target
/// extension is appended in lowercase. A name without any `.` is used
/// whole. `photo.2021.png` + jpeg → `photo.jpeg`.
pub fn derive_output_name(original: &str, format: OutputFormat) -> String {
    let base = original.split('.').next().unwrap_or(original);
    format!("{}.{}", base, format.extension())
}

/// The result of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Converted files, in intake order. Under fail-fast this is every
    /// file; under best-effort the failed ones are simply absent (order of
    /// the survivors is still intake order).
    pub files: Vec<ConvertedFile>,
    /// Per-file failures. Always empty under fail-fast (the batch errors
    /// out instead).
    pub failures: Vec<FileError>,
    /// Aggregate counters for the run.
    pub stats: BatchStats,
}

/// Aggregate counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Files in the intake list.
    pub total_files: usize,
    /// Files that converted successfully.
    pub converted_files: usize,
    /// Files that failed.
    pub failed_files: usize,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
    /// Total bytes across all converted payloads.
    pub output_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_name_strips_from_first_dot() {
        assert_eq!(
            derive_output_name("photo.2021.png", OutputFormat::Jpeg),
            "photo.jpeg"
        );
        assert_eq!(derive_output_name("cat.PNG", OutputFormat::Webp), "cat.webp");
    }

    #[test]
    fn derive_name_dotless_input_used_whole() {
        assert_eq!(derive_output_name("scan", OutputFormat::Pdf), "scan.pdf");
    }

    #[test]
    fn derive_name_extension_is_lowercase_regardless_of_input() {
        assert_eq!(
            derive_output_name("UPPER.JPEG", OutputFormat::Svg),
            "UPPER.svg"
        );
    }

    #[test]
    fn data_url_round_trips_payload() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let f = ConvertedFile::new("a.png", OutputFormat::Png, vec![1, 2, 3, 250]);
        let url = f.data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let b64 = url.split(',').nth(1).unwrap();
        assert_eq!(STANDARD.decode(b64).unwrap(), vec![1, 2, 3, 250]);
    }
}

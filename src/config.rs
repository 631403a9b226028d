//! Request types for an image conversion run.
//!
//! All conversion behaviour is controlled through [`ConversionRequest`],
//! built via its [`ConversionRequestBuilder`]. Keeping every knob in one
//! immutable struct makes it trivial to share a request across the
//! concurrent per-file tasks of a batch and to log exactly what a run was
//! asked to do.
//!
//! A request is immutable once a run starts: the batch orchestrator takes
//! `&ConversionRequest` and clones it into each task untouched.

use crate::error::ConvertError;
use crate::progress::ConversionProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The fixed set of output representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless raster re-encode; the quality factor is ignored.
    Png,
    /// Lossy raster re-encode at the request's quality factor.
    Jpeg,
    /// Lossy raster re-encode at the request's quality factor.
    Webp,
    /// Single-page document sized to the canvas, image embedded losslessly.
    Pdf,
    /// Markup wrapper embedding the raster as a data URI. Not vectorization.
    Svg,
}

impl OutputFormat {
    /// Lowercase file extension appended to derived output names.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }

    /// MIME type of the produced payload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    /// Whether the quality factor has any effect on this format.
    pub fn is_lossy(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }

    /// Whether the output is a plain raster image (as opposed to a
    /// document wrapper).
    pub fn is_raster(&self) -> bool {
        matches!(
            self,
            OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Webp
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    /// Case-insensitive parse of the five supported format names.
    /// `jpg` is accepted as an alias for `jpeg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(ConvertError::InvalidFormat {
                given: other.to_string(),
            }),
        }
    }
}

/// An explicit target box for the scaling blit.
///
/// Both dimensions are always present — a width without a height (or vice
/// versa) is not a representable state. The blit is a direct stretch to
/// this box; aspect ratio is not preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a user-supplied width/height pair the way the intake form
    /// does: non-numeric or empty strings mean "absent", and the pair only
    /// counts when BOTH values parse.
    pub fn from_fields(width: &str, height: &str) -> Option<Self> {
        let w = width.trim().parse::<u32>().ok()?;
        let h = height.trim().parse::<u32>().ok()?;
        Some(Self {
            width: w,
            height: h,
        })
    }
}

/// What a single file failure does to the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// All-or-nothing: the first failure fails the batch and discards all
    /// partial results. (default)
    #[default]
    FailFast,
    /// Keep every file that converts; record each failure alongside.
    BestEffort,
}

/// Parameters for one conversion run.
///
/// Built via [`ConversionRequest::builder()`] or
/// [`ConversionRequest::default()`].
///
/// # Example
/// ```rust
/// use img2any::{ConversionRequest, OutputFormat, Resize};
///
/// let request = ConversionRequest::builder(OutputFormat::Jpeg)
///     .quality(80)
///     .resize(Resize::new(800, 600))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionRequest {
    /// Target output representation.
    pub format: OutputFormat,

    /// Optional target box. `None` keeps each file's natural dimensions.
    pub resize: Option<Resize>,

    /// Quality factor in [1, 100]. Default: 90.
    ///
    /// Meaningful for JPEG and WEBP only; PNG, PDF and SVG embed the
    /// surface losslessly and ignore it.
    pub quality: u8,

    /// Number of files converted concurrently. Default: 8.
    ///
    /// Decode and encode are CPU-bound, so there is little to gain past
    /// the core count. `0` removes the bound entirely and dispatches every
    /// file at once: fine for a handful of drag-dropped images, unbounded
    /// memory for large batches.
    pub concurrency: usize,

    /// Blast radius of a single file failure. Default: fail-fast.
    pub policy: FailurePolicy,

    /// Optional per-file progress events.
    pub progress_callback: Option<Arc<dyn ConversionProgressCallback>>,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            resize: None,
            quality: 90,
            concurrency: 8,
            policy: FailurePolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("format", &self.format)
            .field("resize", &self.resize)
            .field("quality", &self.quality)
            .field("concurrency", &self.concurrency)
            .field("policy", &self.policy)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionRequest {
    /// Create a new builder targeting `format`.
    pub fn builder(format: OutputFormat) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            request: ConversionRequest {
                format,
                ..Self::default()
            },
        }
    }

    /// The effective concurrency bound for `n` files (0 = unbounded).
    pub(crate) fn effective_concurrency(&self, n: usize) -> usize {
        if self.concurrency == 0 {
            n.max(1)
        } else {
            self.concurrency
        }
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug)]
pub struct ConversionRequestBuilder {
    request: ConversionRequest,
}

impl ConversionRequestBuilder {
    pub fn resize(mut self, resize: Resize) -> Self {
        self.request.resize = Some(resize);
        self
    }

    pub fn maybe_resize(mut self, resize: Option<Resize>) -> Self {
        self.request.resize = resize;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.request.quality = quality.clamp(1, 100);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.request.concurrency = n;
        self
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.request.policy = policy;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ConversionProgressCallback>) -> Self {
        self.request.progress_callback = Some(cb);
        self
    }

    /// Build the request, validating constraints.
    pub fn build(self) -> Result<ConversionRequest, ConvertError> {
        let r = &self.request;
        if r.quality < 1 || r.quality > 100 {
            return Err(ConvertError::InvalidRequest(format!(
                "quality must be 1–100, got {}",
                r.quality
            )));
        }
        if let Some(resize) = r.resize {
            if resize.width == 0 || resize.height == 0 {
                return Err(ConvertError::InvalidRequest(format!(
                    "resize dimensions must be non-zero, got {}x{}",
                    resize.width, resize.height
                )));
            }
        }
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_is_case_insensitive() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("Jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn invalid_format_error_is_the_endpoint_string() {
        let err = "bmp".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid format specified.");
    }

    #[test]
    fn lossy_flag_covers_jpeg_and_webp_only() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(OutputFormat::Webp.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
        assert!(!OutputFormat::Pdf.is_lossy());
        assert!(!OutputFormat::Svg.is_lossy());
    }

    #[test]
    fn resize_from_fields_requires_both_values() {
        assert_eq!(Resize::from_fields("200", "100"), Some(Resize::new(200, 100)));
        assert_eq!(Resize::from_fields("", "100"), None);
        assert_eq!(Resize::from_fields("200", ""), None);
        assert_eq!(Resize::from_fields("abc", "100"), None);
    }

    #[test]
    fn builder_clamps_quality() {
        let r = ConversionRequest::builder(OutputFormat::Jpeg)
            .quality(250)
            .build()
            .unwrap();
        assert_eq!(r.quality, 100);

        let r = ConversionRequest::builder(OutputFormat::Jpeg)
            .quality(0)
            .build()
            .unwrap();
        assert_eq!(r.quality, 1);
    }

    #[test]
    fn builder_rejects_zero_resize() {
        let err = ConversionRequest::builder(OutputFormat::Png)
            .resize(Resize::new(0, 100))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn zero_concurrency_means_unbounded() {
        let r = ConversionRequest::builder(OutputFormat::Png)
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(r.effective_concurrency(12), 12);
        assert_eq!(r.effective_concurrency(0), 1);

        let r = ConversionRequest::default();
        assert_eq!(r.effective_concurrency(12), 8);
    }
}

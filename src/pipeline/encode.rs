//! Raster encoding: surface → PNG / JPEG / WEBP bytes.
//!
//! PNG is lossless and ignores the quality factor entirely — identical
//! input and dimensions give byte-identical output at any quality. JPEG
//! uses the `image` crate's encoder at `quality`; WEBP goes through the
//! `webp` crate because the `image` crate only encodes lossless WEBP and
//! the quality knob has to mean something.
//!
//! JPEG has no alpha channel, so RGBA surfaces are flattened to RGB before
//! encoding rather than erroring on the color type.

use crate::config::OutputFormat;
use crate::error::FileError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a surface as one of the raster formats.
///
/// Callers must pass a raster `format` (PNG/JPEG/WEBP); the document
/// wrappers live in [`crate::pipeline::pdf`] and [`crate::pipeline::svg`].
pub fn encode_raster(
    name: &str,
    surface: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, FileError> {
    let encode_err = |detail: String| FileError::EncodeFailed {
        name: name.to_string(),
        format: format.extension().to_string(),
        detail,
    };

    let bytes = match format {
        OutputFormat::Png => encode_png(surface).map_err(|e| encode_err(e.to_string()))?,
        OutputFormat::Jpeg => {
            let mut buf = Vec::new();
            let flat = DynamicImage::ImageRgb8(surface.to_rgb8());
            flat.write_with_encoder(JpegEncoder::new_with_quality(
                &mut Cursor::new(&mut buf),
                quality,
            ))
            .map_err(|e| encode_err(e.to_string()))?;
            buf
        }
        OutputFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(surface.to_rgba8());
            let encoder =
                webp::Encoder::from_image(&rgba).map_err(|e| encode_err(e.to_string()))?;
            encoder.encode(f32::from(quality)).to_vec()
        }
        OutputFormat::Pdf | OutputFormat::Svg => {
            return Err(encode_err("not a raster format".to_string()));
        }
    };

    debug!(
        "Encoded '{}' as {} → {} bytes",
        name,
        format.extension(),
        bytes.len()
    );
    Ok(bytes)
}

/// Lossless PNG encode of a surface.
///
/// Shared by the PNG target and by the document wrappers, which embed the
/// surface losslessly.
pub fn encode_png(surface: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    surface.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn surface(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn png_is_byte_stable_across_quality_values() {
        let s = surface(16, 16);
        let a = encode_raster("a.png", &s, OutputFormat::Png, 10).unwrap();
        let b = encode_raster("a.png", &s, OutputFormat::Png, 95).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn jpeg_round_trips_dimensions() {
        let bytes = encode_raster("a.png", &surface(100, 100), OutputFormat::Jpeg, 80).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.width(), 100);
        assert_eq!(back.height(), 100);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn jpeg_quality_changes_the_payload() {
        // Use a noisy surface so the quantisation tables actually differ.
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 3) as u8, 255])
        });
        let s = DynamicImage::ImageRgba8(img);
        let low = encode_raster("n.png", &s, OutputFormat::Jpeg, 10).unwrap();
        let high = encode_raster("n.png", &s, OutputFormat::Jpeg, 95).unwrap();
        assert!(low.len() < high.len(), "{} !< {}", low.len(), high.len());
    }

    #[test]
    fn webp_output_carries_riff_magic() {
        let bytes = encode_raster("a.png", &surface(32, 32), OutputFormat::Webp, 80).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn document_formats_are_rejected_here() {
        let err = encode_raster("a.png", &surface(4, 4), OutputFormat::Pdf, 80).unwrap_err();
        assert!(matches!(err, FileError::EncodeFailed { .. }));
    }
}

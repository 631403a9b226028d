//! Decode: raw bytes → pixel surface.
//!
//! Format detection is content-based (`image::load_from_memory` sniffs the
//! magic bytes); the intake MIME hint is deliberately ignored so that a
//! mislabelled upload still decodes — or fails with an honest error.

use crate::error::FileError;
use image::DynamicImage;
use tracing::debug;

/// Decode a blob into a surface at its natural dimensions.
pub fn decode(name: &str, data: &[u8]) -> Result<DynamicImage, FileError> {
    let img = image::load_from_memory(data).map_err(|e| FileError::DecodeFailed {
        name: name.to_string(),
        detail: e.to_string(),
    })?;
    debug!(
        "Decoded '{}' → {}x{} px",
        name,
        img.width(),
        img.height()
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png_at_natural_dimensions() {
        let img = decode("a.png", &png_bytes(7, 9)).unwrap();
        assert_eq!((img.width(), img.height()), (7, 9));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode("junk.png", b"definitely not an image").unwrap_err();
        assert!(matches!(err, FileError::DecodeFailed { .. }));
        assert_eq!(err.file_name(), "junk.png");
    }

    #[test]
    fn mime_hint_is_irrelevant_content_wins() {
        // A PNG blob named .jpeg still decodes.
        let img = decode("mislabelled.jpeg", &png_bytes(3, 3)).unwrap();
        assert_eq!(img.width(), 3);
    }
}

//! SVG wrapping: embed the surface as a data URI inside a minimal markup
//! container.
//!
//! The root element declares the target width/height and contains exactly
//! one `<image>` element whose `href` is the losslessly PNG-encoded
//! surface as a base64 data URI. This is NOT vector tracing: the payload
//! stays raster, the container merely makes it addressable as SVG. Do not
//! "upgrade" this to contour tracing; the wrapper semantics are the
//! contract.

use crate::error::FileError;
use crate::pipeline::encode::encode_png;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use tracing::debug;

/// Wrap a surface into an SVG document embedding it as a PNG data URI.
pub fn wrap_svg(name: &str, surface: &DynamicImage) -> Result<Vec<u8>, FileError> {
    let png = encode_png(surface).map_err(|e| FileError::EncodeFailed {
        name: name.to_string(),
        format: "svg".to_string(),
        detail: e.to_string(),
    })?;

    let width = surface.width();
    let height = surface.height();
    let svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
         <image href=\"data:image/png;base64,{data}\" width=\"{width}\" height=\"{height}\"/>\
         </svg>",
        data = STANDARD.encode(&png),
    );

    debug!(
        "Wrapped '{}' into a {}x{} SVG container ({} bytes)",
        name,
        width,
        height,
        svg.len()
    );
    Ok(svg.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn surface(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255])))
    }

    #[test]
    fn root_declares_the_target_dimensions() {
        let bytes = wrap_svg("a.png", &surface(200, 100)).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"100\""));
    }

    #[test]
    fn embedded_data_uri_decodes_back_to_the_surface() {
        let bytes = wrap_svg("a.png", &surface(5, 6)).unwrap();
        let svg = String::from_utf8(bytes).unwrap();

        let b64 = svg
            .split("data:image/png;base64,")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .expect("data URI present");
        let png = STANDARD.decode(b64).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (5, 6));
    }

    #[test]
    fn output_is_a_wrapper_not_a_vectorization() {
        // One embedded raster image, no path data.
        let bytes = wrap_svg("a.png", &surface(4, 4)).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert_eq!(svg.matches("<image ").count(), 1);
        assert!(!svg.contains("<path"));
    }
}

//! PDF wrapping: embed the surface as the single full-bleed page of a new
//! document.
//!
//! The page's MediaBox is sized exactly to the target canvas (1 px = 1 pt)
//! and the image is drawn at offset (0,0) filling the whole page. The
//! surface is embedded losslessly: raw RGB samples in an image XObject,
//! Flate-compressed by the final `Document::compress` pass. This is NOT a
//! layout engine — one page, one image, nothing else.
//!
//! Alpha is flattened: PDF image XObjects carry transparency in a separate
//! SMask stream, which a full-bleed conversion target does not need.

use crate::error::FileError;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// Wrap a surface into a one-page PDF document.
pub fn wrap_pdf(name: &str, surface: &DynamicImage) -> Result<Vec<u8>, FileError> {
    let encode_err = |detail: String| FileError::EncodeFailed {
        name: name.to_string(),
        format: "pdf".to_string(),
        detail,
    };

    let width = surface.width() as i64;
    let height = surface.height() as i64;
    let rgb = surface.to_rgb8();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    );
    let image_id = doc.add_object(image_stream);

    // q / cm / Do / Q: scale the unit-square image to the full page and
    // paint it at the origin.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content.encode().map_err(|e| encode_err(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| encode_err(e.to_string()))?;

    debug!(
        "Wrapped '{}' into a {}x{} pt single-page PDF ({} bytes)",
        name,
        width,
        height,
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn surface(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([0, 128, 255, 255])))
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes = wrap_pdf("a.png", &surface(10, 10)).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn document_has_one_page_sized_to_the_canvas() {
        let bytes = wrap_pdf("a.png", &surface(120, 80)).unwrap();
        let doc = Document::load_mem(&bytes).expect("output must reload");

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let (_, page_id) = pages.into_iter().next().unwrap();
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .expect("page dict");
        let media_box = page
            .get(b"MediaBox")
            .and_then(Object::as_array)
            .expect("MediaBox");
        let dims: Vec<i64> = media_box.iter().map(|o| o.as_i64().unwrap()).collect();
        assert_eq!(dims, vec![0, 0, 120, 80]);
    }

    #[test]
    fn page_references_the_embedded_image() {
        let bytes = wrap_pdf("a.png", &surface(4, 4)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .expect("page dict");
        let xobjects = page
            .get(b"Resources")
            .and_then(Object::as_dict)
            .expect("resources dict")
            .get(b"XObject")
            .and_then(Object::as_dict)
            .expect("XObject dict");
        assert!(xobjects.has(b"Im0"));
    }
}

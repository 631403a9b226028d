//! Resize: scaling blit into the target box.
//!
//! The blit fills the full target box from origin (0,0) — a direct
//! stretch/shrink with NO aspect-ratio preservation and no cropping.
//! Requesting 200×100 for a square input yields a 200×100 surface with the
//! image distorted to fit, exactly like drawing onto a canvas of that size.

use crate::config::Resize;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Blit `surface` into the target box.
///
/// `target = None` keeps the natural dimensions (the surface passes
/// through untouched). A target equal to the natural size is also a
/// no-op — `resize_exact` would only burn CPU re-sampling identity.
pub fn blit(surface: DynamicImage, target: Option<Resize>) -> DynamicImage {
    match target {
        None => surface,
        Some(Resize { width, height })
            if width == surface.width() && height == surface.height() =>
        {
            surface
        }
        Some(Resize { width, height }) => {
            debug!(
                "Blit {}x{} → {}x{}",
                surface.width(),
                surface.height(),
                width,
                height
            );
            surface.resize_exact(width, height, FilterType::Triangle)
        }
    }
}

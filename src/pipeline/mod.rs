//! Pipeline stages for a single file conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different WEBP encoder) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ resize ──▶ encode | pdf | svg
//! (bytes)    (blit)     (target representation)
//! ```
//!
//! 1. [`decode`] — sniff and decode the blob into a pixel surface
//! 2. [`resize`] — scaling blit into the target box (skipped when the
//!    target equals the natural size)
//! 3. [`encode`] — raster re-encode (PNG/JPEG/WEBP) at the quality factor
//! 4. [`pdf`]    — wrap the surface as the single full-bleed page of a
//!    new document
//! 5. [`svg`]    — wrap the surface as a data URI inside a minimal markup
//!    container

pub mod decode;
pub mod encode;
pub mod pdf;
pub mod resize;
pub mod svg;

//! # img2any
//!
//! Convert raster images between PNG, JPEG and WEBP, or wrap them into
//! simple derivative documents (a single-image PDF page, an SVG container),
//! with optional resizing, quality control, and batch download as a ZIP
//! archive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! files
//!  │
//!  ├─ 1. Intake   ordered list, removable entries (ConversionSession)
//!  ├─ 2. Decode   blob → pixel surface (CPU-bound, spawn_blocking)
//!  ├─ 3. Resize   scaling blit into the target box (no aspect preservation)
//!  ├─ 4. Encode   PNG/JPEG/WEBP re-encode, or PDF/SVG wrapping
//!  ├─ 5. Batch    concurrent fan-out, fail-fast or best-effort policy
//!  └─ 6. Archive  all outputs into one deflate ZIP
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2any::{convert_batch, ConversionRequest, OutputFormat, SourceFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let files = vec![SourceFile::from_path("photo.png")?];
//!     let request = ConversionRequest::builder(OutputFormat::Webp)
//!         .quality(80)
//!         .build()?;
//!     let output = convert_batch(&files, &request).await?;
//!     std::fs::write(&output.files[0].name, &output.files[0].data)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `img2any` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | off     | Enables the `img2any-server` binary and [`server`] module (axum + tower-http) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! img2any = { version = "0.3", default-features = false }
//! ```
//!
//! ## What SVG output is (and isn't)
//!
//! The SVG target embeds the raster surface as a base64 data URI inside a
//! minimal markup container. It is **not** vector tracing — the payload
//! stays raster and scales like one.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::package_all;
pub use config::{
    ConversionRequest, ConversionRequestBuilder, FailurePolicy, OutputFormat, Resize,
};
pub use convert::{convert_batch, convert_batch_sync, convert_one};
pub use error::{ConvertError, FileError};
pub use input::SourceFile;
pub use output::{derive_output_name, BatchOutput, BatchStats, ConvertedFile};
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, RunProgress,
};
pub use session::{ConversionSession, SessionEvent, SessionObserver};
pub use stream::{convert_stream, FileStream};

//! HTTP service binary for img2any.
//!
//! Serves the static front-end build and mirrors the conversion pipeline
//! at `POST /api/convert`. Requires the `server` feature:
//!
//! ```text
//! cargo run --no-default-features --features server --bin img2any-server
//! ```
//!
//! Configuration is environment-only, like the service it mirrors:
//! - `PORT`               — listen port (default 3001)
//! - `IMG2ANY_STATIC_DIR` — static asset directory (default `build`)
//! - `RUST_LOG`           — tracing filter (default `info`)

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let static_dir =
        std::env::var("IMG2ANY_STATIC_DIR").unwrap_or_else(|_| "build".to_string());

    img2any::server::serve(static_dir)
        .await
        .context("Server failed")
}

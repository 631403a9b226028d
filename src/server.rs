//! HTTP mirror of the conversion pipeline (feature = "server").
//!
//! `POST /api/convert` takes a multipart form with a file field `image`
//! and a text field `format`, and answers with the re-encoded bytes as an
//! attachment. The endpoint deliberately exposes a reduced surface: raster
//! formats only (`svg` and `pdf` answer 400), no resize or quality knobs —
//! the document wrappers belong to the client-side flow. It routes through
//! the same [`crate::convert::convert_one`] as the library so there is
//! exactly one encode path.
//!
//! Static assets are served from a build directory at the root path, and
//! the port comes from the `PORT` environment variable (default 3001).

use crate::config::{ConversionRequest, OutputFormat};
use crate::convert::convert_one;
use crate::input::SourceFile;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3001;

/// Uploads beyond this are rejected by the body-limit layer.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
///
/// `static_dir` is served at the root path; pass the build output
/// directory of the front-end, or any directory — a missing one simply
/// 404s.
pub fn router(static_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/api/convert", post(convert_handler))
        .fallback_service(ServeDir::new(static_dir.into()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Bind and serve until the task is cancelled.
///
/// The port is taken from the `PORT` environment variable, defaulting to
/// [`DEFAULT_PORT`].
pub async fn serve(static_dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on port {port}");
    axum::serve(listener, router(static_dir)).await
}

/// `POST /api/convert` — multipart fields `image` (file) and `format`.
async fn convert_handler(mut multipart: Multipart) -> Response {
    let mut file: Option<SourceFile> = None;
    let mut format_field: Option<String> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => match field.name() {
                Some("image") => {
                    let name = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| "upload".to_string());
                    match field.bytes().await {
                        Ok(bytes) => file = Some(SourceFile::new(name, bytes.to_vec())),
                        Err(e) => {
                            error!("Upload read failed: {e}");
                            return (StatusCode::BAD_REQUEST, "No file uploaded.")
                                .into_response();
                        }
                    }
                }
                Some("format") => {
                    format_field = field.text().await.ok();
                }
                _ => {}
            },
            Ok(None) => break,
            Err(e) => {
                error!("Malformed multipart body: {e}");
                return (StatusCode::BAD_REQUEST, "No file uploaded.").into_response();
            }
        }
    }

    let Some(file) = file else {
        return (StatusCode::BAD_REQUEST, "No file uploaded.").into_response();
    };

    let format = match format_field.as_deref().map(str::parse::<OutputFormat>) {
        Some(Ok(OutputFormat::Svg)) => {
            return (StatusCode::BAD_REQUEST, "SVG conversion not supported.").into_response();
        }
        Some(Ok(OutputFormat::Pdf)) => {
            return (StatusCode::BAD_REQUEST, "PDF conversion not supported.").into_response();
        }
        Some(Ok(f)) => f,
        _ => {
            return (StatusCode::BAD_REQUEST, "Invalid format specified.").into_response();
        }
    };

    let request = match ConversionRequest::builder(format).build() {
        Ok(r) => r,
        Err(e) => {
            error!("Request build failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error during conversion")
                .into_response();
        }
    };

    let converted =
        tokio::task::spawn_blocking(move || convert_one(&file, &request)).await;

    match converted {
        Ok(Ok(out)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.mime_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=converted.{}", format.extension()),
                ),
            ],
            out.data,
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Conversion error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error during conversion").into_response()
        }
        Err(e) => {
            error!("Conversion task panicked: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error during conversion").into_response()
        }
    }
}

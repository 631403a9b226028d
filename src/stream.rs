//! Streaming conversion API: emit files as they complete.
//!
//! Unlike the eager [`crate::convert::convert_batch`], which returns only
//! after all files finish, [`convert_stream`] yields each file's result as
//! soon as its pipeline run completes. Results arrive in completion order,
//! not intake order — each item carries its intake index so callers that
//! care can re-sort.
//!
//! The stream is policy-free: every file's `Result` is surfaced and the
//! caller decides what a failure means, which makes it the natural
//! building block for UIs that tick a real progress bar per file.

use crate::config::ConversionRequest;
use crate::convert::convert_one;
use crate::error::FileError;
use crate::input::SourceFile;
use crate::output::ConvertedFile;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file results, tagged with the intake index.
pub type FileStream = Pin<Box<dyn Stream<Item = (usize, Result<ConvertedFile, FileError>)> + Send>>;

/// Convert the intake files, streaming each result as it is ready.
///
/// Files are emitted in completion order. An empty intake yields an empty
/// stream (the eager API is the one that treats it as an error).
pub fn convert_stream(files: Vec<SourceFile>, request: &ConversionRequest) -> FileStream {
    let total = files.len();
    let concurrency = request.effective_concurrency(total);
    let request = request.clone();
    info!("Starting streaming batch: {} files", total);

    Box::pin(
        stream::iter(files.into_iter().enumerate().map(move |(index, file)| {
            let request = request.clone();
            async move {
                let result =
                    tokio::task::spawn_blocking(move || convert_one(&file, &request)).await;
                let result = match result {
                    Ok(r) => r,
                    Err(join_err) => Err(FileError::EncodeFailed {
                        name: format!("file {index}"),
                        format: "unknown".to_string(),
                        detail: format!("conversion task panicked: {join_err}"),
                    }),
                };
                (index, result)
            }
        }))
        .buffer_unordered(concurrency),
    )
}

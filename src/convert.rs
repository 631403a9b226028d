//! Eager (full-batch) conversion entry points.
//!
//! ## Why eager vs. streaming?
//!
//! This module provides the simpler API: wait for every file, then return.
//! It collects all per-file results, restores intake order, and assembles a
//! [`BatchOutput`] before returning. Use [`crate::stream::convert_stream`]
//! instead when you want outputs progressively as they complete.
//!
//! ## Failure policy
//!
//! The default is all-or-nothing: one bad file fails the whole batch and
//! discards every partial result ([`FailurePolicy::FailFast`]). Callers
//! that prefer the partial-success model opt into
//! [`FailurePolicy::BestEffort`], which keeps the survivors and records
//! each failure next to them.

use crate::config::{ConversionRequest, FailurePolicy, OutputFormat};
use crate::error::{ConvertError, FileError};
use crate::input::SourceFile;
use crate::output::{derive_output_name, BatchOutput, BatchStats, ConvertedFile};
use crate::pipeline::{decode, encode, pdf, resize, svg};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the full pipeline over a single file.
///
/// Decode → blit into the target box → encode per the requested format →
/// derive the output name. Fails with a [`FileError`] naming the file; the
/// caller decides the blast radius.
///
/// This is synchronous and CPU-bound; the batch orchestrator runs it under
/// `spawn_blocking` so the async executor stays responsive.
pub fn convert_one(
    file: &SourceFile,
    request: &ConversionRequest,
) -> Result<ConvertedFile, FileError> {
    let surface = decode::decode(&file.name, &file.data)?;
    let surface = resize::blit(surface, request.resize);

    let data = match request.format {
        OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Webp => {
            encode::encode_raster(&file.name, &surface, request.format, request.quality)?
        }
        OutputFormat::Pdf => pdf::wrap_pdf(&file.name, &surface)?,
        OutputFormat::Svg => svg::wrap_svg(&file.name, &surface)?,
    };

    let name = derive_output_name(&file.name, request.format);
    debug!("Converted '{}' → '{}' ({} bytes)", file.name, name, data.len());
    Ok(ConvertedFile::new(name, request.format, data))
}

/// Convert every intake file per the request.
///
/// All files are dispatched concurrently (bounded by
/// `request.concurrency`, `0` = unbounded) and joined; the output list is
/// restored to intake order, so index `i` of the input corresponds to
/// index `i` of the output when nothing fails.
///
/// # Errors
/// - [`ConvertError::EmptyInput`] for a zero-file intake.
/// - [`ConvertError::BatchFailed`] under fail-fast when any file fails —
///   no partial results are retained.
///
/// Under best-effort a batch with failures still returns `Ok`; inspect
/// `output.failures` and `output.stats`.
pub async fn convert_batch(
    files: &[SourceFile],
    request: &ConversionRequest,
) -> Result<BatchOutput, ConvertError> {
    if files.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let start = Instant::now();
    let total = files.len();
    info!(
        "Starting batch: {} files → {} ({:?})",
        total, request.format, request.policy
    );

    if let Some(ref cb) = request.progress_callback {
        cb.on_batch_start(total);
    }

    // Restore intake order; completion order is whatever the executor gave us.
    let mut results = run_all(files, request).await;
    results.sort_by_key(|(index, _)| *index);

    let mut converted = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (index, result) in results {
        match result {
            Ok(file) => converted.push(file),
            Err(err) => match request.policy {
                FailurePolicy::FailFast => {
                    if let Some(ref cb) = request.progress_callback {
                        cb.on_batch_complete(total, converted.len());
                    }
                    return Err(ConvertError::BatchFailed {
                        index,
                        name: err.file_name().to_string(),
                        source: err,
                    });
                }
                FailurePolicy::BestEffort => {
                    warn!("Keeping batch alive past failure: {}", err);
                    failures.push(err);
                }
            },
        }
    }

    let stats = BatchStats {
        total_files: total,
        converted_files: converted.len(),
        failed_files: failures.len(),
        duration_ms: start.elapsed().as_millis() as u64,
        output_bytes: converted.iter().map(|f| f.data.len() as u64).sum(),
    };

    info!(
        "Batch complete: {}/{} files in {}ms",
        stats.converted_files, total, stats.duration_ms
    );

    if let Some(ref cb) = request.progress_callback {
        cb.on_batch_complete(total, stats.converted_files);
    }

    Ok(BatchOutput {
        files: converted,
        failures,
        stats,
    })
}

/// Dispatch every file concurrently and collect `(index, result)` pairs
/// in completion order.
pub(crate) async fn run_all(
    files: &[SourceFile],
    request: &ConversionRequest,
) -> Vec<(usize, Result<ConvertedFile, FileError>)> {
    let total = files.len();
    let concurrency = request.effective_concurrency(total);

    stream::iter(files.iter().cloned().enumerate().map(|(index, file)| {
        let request = request.clone();
        async move {
            if let Some(ref cb) = request.progress_callback {
                cb.on_file_start(index, &file.name, total);
            }

            let name = file.name.clone();
            let req = request.clone();
            let result = tokio::task::spawn_blocking(move || convert_one(&file, &req)).await;

            let result = match result {
                Ok(r) => r,
                Err(join_err) => Err(FileError::EncodeFailed {
                    name: name.clone(),
                    format: request.format.extension().to_string(),
                    detail: format!("conversion task panicked: {join_err}"),
                }),
            };

            if let Some(ref cb) = request.progress_callback {
                match &result {
                    Ok(f) => cb.on_file_complete(index, &name, total, f.data.len()),
                    Err(e) => cb.on_file_error(index, &name, total, e.to_string()),
                }
            }

            (index, result)
        }
    }))
    .buffer_unordered(concurrency)
    .collect()
    .await
}

/// Synchronous wrapper around [`convert_batch`].
///
/// Creates a temporary tokio runtime internally. Use from non-async
/// contexts only.
pub fn convert_batch_sync(
    files: &[SourceFile],
    request: &ConversionRequest,
) -> Result<BatchOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(convert_batch(files, request))
}

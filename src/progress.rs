//! Progress-callback trait for per-file conversion events.
//!
//! Inject an `Arc<dyn ConversionProgressCallback>` via
//! [`crate::config::ConversionRequestBuilder::progress_callback`] to receive
//! real-time events as the batch processes each file.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a WebSocket, a host iframe, or a
//! terminal progress bar without the library knowing anything about how the
//! host application communicates. The trait is `Send + Sync` so it works
//! correctly when files are processed concurrently.
//!
//! The percentage shown to users is carried by [`RunProgress`], which is
//! driven by genuine completion counts rather than a wall-clock timer:
//! 0 at run start, `completed / total` while running, snapped to 100 on
//! success and reset to 0 on failure.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each file.
///
/// Implementations must be `Send + Sync` (files are processed
/// concurrently). All methods have default no-op implementations so
/// callers only override what they care about.
///
/// # Thread safety
///
/// `on_file_start`, `on_file_complete` and `on_file_error` may be called
/// concurrently from different tasks. Implementations must protect shared
/// mutable state with appropriate synchronisation (`Mutex`, atomics).
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any file is converted.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file enters the pipeline.
    ///
    /// `index` is the file's position in the intake list (0-based).
    fn on_file_start(&self, index: usize, name: &str, total_files: usize) {
        let _ = (index, name, total_files);
    }

    /// Called when a file converts successfully.
    ///
    /// `output_len` is the byte length of the produced payload.
    fn on_file_complete(&self, index: usize, name: &str, total_files: usize, output_len: usize) {
        let _ = (index, name, total_files, output_len);
    }

    /// Called when a file fails to convert.
    fn on_file_error(&self, index: usize, name: &str, total_files: usize, error: String) {
        let _ = (index, name, total_files, error);
    }

    /// Called once after all files have been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionRequest`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Shared run-progress percentage in [0, 100].
///
/// Reset to 0 when a run starts, advanced from real per-file completions,
/// snapped to 100 when the run succeeds and back to 0 when it fails.
/// Cheap to clone and safe to read from any thread.
#[derive(Debug, Default)]
pub struct RunProgress {
    percent: AtomicU8,
}

impl RunProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage.
    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    /// Reset to 0 (run start, or run failure).
    pub fn reset(&self) {
        self.percent.store(0, Ordering::Relaxed);
    }

    /// Record that `completed` of `total` files have finished.
    pub fn set_completed(&self, completed: usize, total: usize) {
        let pct = if total == 0 {
            0
        } else {
            ((completed * 100) / total).min(100) as u8
        };
        self.percent.store(pct, Ordering::Relaxed);
    }

    /// Snap to 100 (run success).
    pub fn finish(&self) {
        self.percent.store(100, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_file_start(&self, _index: usize, _name: &str, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_complete(&self, _index: usize, _name: &str, _total: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_error(&self, _index: usize, _name: &str, _total: usize, _error: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(3);
        cb.on_file_start(0, "a.png", 3);
        cb.on_file_complete(0, "a.png", 3, 42);
        cb.on_file_error(1, "b.png", 3, "bad magic".to_string());
        cb.on_batch_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };
        t.on_file_start(0, "a.png", 2);
        t.on_file_complete(0, "a.png", 2, 100);
        t.on_file_start(1, "b.png", 2);
        t.on_file_error(1, "b.png", 2, "truncated".to_string());

        assert_eq!(t.starts.load(Ordering::SeqCst), 2);
        assert_eq!(t.completes.load(Ordering::SeqCst), 1);
        assert_eq!(t.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn run_progress_tracks_completion_ratio() {
        let p = RunProgress::new();
        assert_eq!(p.percent(), 0);

        p.set_completed(1, 4);
        assert_eq!(p.percent(), 25);
        p.set_completed(4, 4);
        assert_eq!(p.percent(), 100);

        p.reset();
        assert_eq!(p.percent(), 0);

        p.finish();
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn run_progress_zero_total_stays_at_zero() {
        let p = RunProgress::new();
        p.set_completed(0, 0);
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn arc_dyn_callback_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopProgressCallback>();

        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
    }
}

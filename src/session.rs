//! Session state: the intake list, output list, and run progress for one
//! active conversion view.
//!
//! Front-ends tend to scatter these three pieces of state across reactive
//! hooks; here they live in an explicit [`ConversionSession`] owned by the
//! caller, with accessor methods replacing reactive state. A host
//! embedding the tool (an iframe, a GUI panel) registers a
//! [`SessionObserver`] and receives a [`SessionEvent`] on every
//! layout-affecting change — file list changes, output changes, progress
//! changes — so it can re-measure and resize the embedded view.

use crate::archive::package_all;
use crate::config::ConversionRequest;
use crate::convert::convert_batch;
use crate::error::ConvertError;
use crate::input::SourceFile;
use crate::output::{BatchStats, ConvertedFile};
use crate::progress::RunProgress;
use std::sync::Arc;
use tracing::debug;

/// A layout-affecting state change a host may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The intake list changed; carries the new length.
    IntakeChanged { files: usize },
    /// The output list changed; carries the new length.
    OutputsChanged { files: usize },
    /// The run-progress percentage changed.
    ProgressChanged { percent: u8 },
}

/// Host notification hook. `Send + Sync` because progress events originate
/// from concurrent per-file tasks.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

impl<F: Fn(SessionEvent) + Send + Sync> SessionObserver for F {
    fn on_event(&self, event: SessionEvent) {
        self(event)
    }
}

/// Process-local mutable state for one conversion view.
///
/// Not `Clone` on purpose: the session is the single owner of its lists,
/// and every mutation notifies the registered observer exactly once.
pub struct ConversionSession {
    files: Vec<SourceFile>,
    outputs: Vec<ConvertedFile>,
    progress: Arc<RunProgress>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionSession {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            outputs: Vec::new(),
            progress: Arc::new(RunProgress::new()),
            observer: None,
        }
    }

    /// Register the host notification hook.
    pub fn set_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(ref obs) = self.observer {
            obs.on_event(event);
        }
    }

    // ── Intake ───────────────────────────────────────────────────────────

    /// Append files to the intake list in order. No dedup, no validation —
    /// an undecodable blob only surfaces when a run reaches it.
    pub fn add_files(&mut self, files: Vec<SourceFile>) {
        if files.is_empty() {
            return;
        }
        self.files.extend(files);
        self.notify(SessionEvent::IntakeChanged {
            files: self.files.len(),
        });
    }

    /// Remove one intake entry. A silent no-op when `index` is out of range.
    pub fn remove_file(&mut self, index: usize) {
        if index >= self.files.len() {
            debug!("remove_file({index}) out of range, ignoring");
            return;
        }
        self.files.remove(index);
        self.notify(SessionEvent::IntakeChanged {
            files: self.files.len(),
        });
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    // ── Outputs ──────────────────────────────────────────────────────────

    /// Remove one converted entry. A silent no-op when out of range.
    pub fn remove_output(&mut self, index: usize) {
        if index >= self.outputs.len() {
            debug!("remove_output({index}) out of range, ignoring");
            return;
        }
        self.outputs.remove(index);
        self.notify(SessionEvent::OutputsChanged {
            files: self.outputs.len(),
        });
    }

    pub fn outputs(&self) -> &[ConvertedFile] {
        &self.outputs
    }

    /// Current run-progress percentage.
    pub fn progress(&self) -> u8 {
        self.progress.percent()
    }

    // ── Conversion ───────────────────────────────────────────────────────

    /// Convert the intake list per `request` and store the results.
    ///
    /// Progress is reset to 0 at run start, advanced from genuine per-file
    /// completions, snapped to 100 on success, and reset to 0 on failure.
    /// Under fail-fast a failure leaves the previous output list intact
    /// (nothing from the failed run is retained); under best-effort the
    /// surviving files replace the output list and the failures are
    /// returned in the stats' failed count.
    pub async fn convert(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<BatchStats, ConvertError> {
        self.progress.reset();
        self.notify(SessionEvent::ProgressChanged { percent: 0 });

        let tracker = Arc::new(ProgressTracker {
            progress: Arc::clone(&self.progress),
            observer: self.observer.clone(),
            inner: request.progress_callback.clone(),
            completed: std::sync::atomic::AtomicUsize::new(0),
        });

        let mut tracked = request.clone();
        tracked.progress_callback = Some(tracker);

        match convert_batch(&self.files, &tracked).await {
            Ok(batch) => {
                self.progress.finish();
                self.notify(SessionEvent::ProgressChanged { percent: 100 });
                self.outputs = batch.files;
                self.notify(SessionEvent::OutputsChanged {
                    files: self.outputs.len(),
                });
                Ok(batch.stats)
            }
            Err(e) => {
                self.progress.reset();
                self.notify(SessionEvent::ProgressChanged { percent: 0 });
                Err(e)
            }
        }
    }

    /// Bundle the current output list into a ZIP archive.
    pub fn package_outputs(&self) -> Result<Vec<u8>, ConvertError> {
        package_all(&self.outputs)
    }
}

/// Bridges batch callbacks to the session's progress state, forwarding to
/// any caller-supplied callback underneath.
struct ProgressTracker {
    progress: Arc<RunProgress>,
    observer: Option<Arc<dyn SessionObserver>>,
    inner: Option<Arc<dyn crate::progress::ConversionProgressCallback>>,
    completed: std::sync::atomic::AtomicUsize,
}

impl crate::progress::ConversionProgressCallback for ProgressTracker {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref cb) = self.inner {
            cb.on_batch_start(total_files);
        }
    }

    fn on_file_start(&self, index: usize, name: &str, total_files: usize) {
        if let Some(ref cb) = self.inner {
            cb.on_file_start(index, name, total_files);
        }
    }

    fn on_file_complete(&self, index: usize, name: &str, total_files: usize, output_len: usize) {
        self.bump(total_files);
        if let Some(ref cb) = self.inner {
            cb.on_file_complete(index, name, total_files, output_len);
        }
    }

    fn on_file_error(&self, index: usize, name: &str, total_files: usize, error: String) {
        self.bump(total_files);
        if let Some(ref cb) = self.inner {
            cb.on_file_error(index, name, total_files, error);
        }
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        if let Some(ref cb) = self.inner {
            cb.on_batch_complete(total_files, success_count);
        }
    }
}

impl ProgressTracker {
    fn bump(&self, total: usize) {
        use std::sync::atomic::Ordering;
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        self.progress.set_completed(done, total);
        if let Some(ref obs) = self.observer {
            obs.on_event(SessionEvent::ProgressChanged {
                percent: self.progress.percent(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FailurePolicy, OutputFormat};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn png_file(name: &str) -> SourceFile {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([7, 7, 7, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        SourceFile::new(name, buf)
    }

    #[test]
    fn add_and_remove_preserve_order() {
        let mut s = ConversionSession::new();
        s.add_files(vec![png_file("a.png"), png_file("b.png"), png_file("c.png")]);
        assert_eq!(s.files().len(), 3);

        s.remove_file(1);
        let names: Vec<&str> = s.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn out_of_range_removal_is_a_silent_noop() {
        let mut s = ConversionSession::new();
        s.add_files(vec![png_file("a.png")]);
        s.remove_file(5);
        s.remove_output(0);
        assert_eq!(s.files().len(), 1);
    }

    #[test]
    fn mutations_notify_the_observer() {
        let events: Arc<Mutex<Vec<SessionEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut s = ConversionSession::new();
        s.set_observer(Arc::new(move |e: SessionEvent| {
            sink.lock().unwrap().push(e);
        }));

        s.add_files(vec![png_file("a.png")]);
        s.remove_file(0);

        let seen = events.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                SessionEvent::IntakeChanged { files: 1 },
                SessionEvent::IntakeChanged { files: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn convert_fills_outputs_and_snaps_progress_to_100() {
        let mut s = ConversionSession::new();
        s.add_files(vec![png_file("a.png"), png_file("b.png")]);

        let request = ConversionRequest::builder(OutputFormat::Jpeg)
            .build()
            .unwrap();
        let stats = s.convert(&request).await.unwrap();

        assert_eq!(stats.converted_files, 2);
        assert_eq!(s.outputs().len(), 2);
        assert_eq!(s.outputs()[0].name, "a.jpeg");
        assert_eq!(s.progress(), 100);
    }

    #[tokio::test]
    async fn failed_fail_fast_run_resets_progress_and_keeps_old_outputs() {
        let mut s = ConversionSession::new();
        s.add_files(vec![png_file("good.png")]);

        let request = ConversionRequest::default();
        s.convert(&request).await.unwrap();
        assert_eq!(s.outputs().len(), 1);

        // Second run with a corrupt file under fail-fast.
        s.add_files(vec![SourceFile::new("bad.png", b"junk".to_vec())]);
        let err = s.convert(&request).await.unwrap_err();
        assert!(matches!(err, ConvertError::BatchFailed { .. }));

        assert_eq!(s.progress(), 0);
        // The previous run's outputs are untouched.
        assert_eq!(s.outputs().len(), 1);
    }

    #[tokio::test]
    async fn best_effort_run_stores_survivors() {
        let mut s = ConversionSession::new();
        s.add_files(vec![
            png_file("good.png"),
            SourceFile::new("bad.png", b"junk".to_vec()),
        ]);

        let request = ConversionRequest::builder(OutputFormat::Png)
            .policy(FailurePolicy::BestEffort)
            .build()
            .unwrap();
        let stats = s.convert(&request).await.unwrap();

        assert_eq!(stats.converted_files, 1);
        assert_eq!(stats.failed_files, 1);
        assert_eq!(s.outputs().len(), 1);
        assert_eq!(s.progress(), 100);
    }

    #[tokio::test]
    async fn package_outputs_requires_at_least_one_file() {
        let s = ConversionSession::new();
        assert!(matches!(
            s.package_outputs().unwrap_err(),
            ConvertError::EmptyInput
        ));
    }
}

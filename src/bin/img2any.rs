//! CLI binary for img2any.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest`, writes the converted files, and optionally bundles
//! them into a ZIP archive.

use anyhow::{Context, Result};
use clap::Parser;
use img2any::{
    convert_batch, package_all, ConversionProgressCallback, ConversionRequest, FailurePolicy,
    OutputFormat, ProgressCallback, Resize, SourceFile,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live bar and per-file log lines.
/// Works correctly when files complete out of order (concurrent batch).
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(total: usize) -> Arc<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Converting");
        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_file_complete(&self, _index: usize, name: &str, _total: usize, output_len: usize) {
        self.bar.println(format!(
            "  {} {:<30}  {}",
            green("✓"),
            name,
            dim(&format!("{output_len:>8} bytes"))
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, name: &str, _total: usize, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };
        self.bar
            .println(format!("  {} {:<30}  {}", red("✗"), name, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = total_files.saturating_sub(success_count);
        if failed == 0 {
            eprintln!(
                "{} {} files converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                red("✘"),
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Re-encode to WEBP at quality 80
  img2any -f webp -q 80 photo.png

  # Stretch-resize into an exact box (both dimensions required)
  img2any -f jpeg --width 800 --height 600 *.png

  # Wrap each image as a one-page PDF
  img2any -f pdf scan1.png scan2.png -o out/

  # Convert a folder's worth and bundle the outputs
  img2any -f png --zip converted_images.zip shots/*.webp

  # Keep the survivors when some files are corrupt
  img2any -f jpeg --policy best-effort mixed/*.png

FORMATS:
  png    lossless re-encode (quality ignored)
  jpeg   lossy re-encode at --quality
  webp   lossy re-encode at --quality
  pdf    one-page document sized to the image
  svg    markup wrapper embedding the raster (NOT vector tracing)
"#;

/// Convert raster images between PNG, JPEG, WEBP, PDF and SVG.
#[derive(Parser, Debug)]
#[command(
    name = "img2any",
    version,
    about = "Convert raster images between PNG, JPEG, WEBP, PDF and SVG",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input image files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Target format.
    #[arg(short, long, value_enum)]
    format: FormatArg,

    /// Quality factor for JPEG/WEBP (1–100).
    #[arg(short, long, env = "IMG2ANY_QUALITY", default_value_t = 90,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Target width in pixels (stretch, no aspect preservation).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Target height in pixels (stretch, no aspect preservation).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Directory to write converted files into.
    #[arg(short, long, env = "IMG2ANY_OUTDIR", default_value = ".")]
    outdir: PathBuf,

    /// Additionally bundle all outputs into this ZIP archive.
    #[arg(long)]
    zip: Option<PathBuf>,

    /// What a single file failure does to the batch.
    #[arg(long, value_enum, default_value = "fail-fast")]
    policy: PolicyArg,

    /// Number of files converted concurrently (0 = unbounded).
    #[arg(short, long, env = "IMG2ANY_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Print a JSON batch report instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "IMG2ANY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2ANY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "IMG2ANY_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
    Webp,
    Pdf,
    Svg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Webp => OutputFormat::Webp,
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    FailFast,
    BestEffort,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(v: PolicyArg) -> Self {
        match v {
            PolicyArg::FailFast => FailurePolicy::FailFast,
            PolicyArg::BestEffort => FailurePolicy::BestEffort,
        }
    }
}

/// JSON report shape for `--json`: names and sizes, not payloads.
#[derive(serde::Serialize)]
struct JsonReport {
    files: Vec<JsonFile>,
    failures: Vec<String>,
    stats: img2any::BatchStats,
}

#[derive(serde::Serialize)]
struct JsonFile {
    name: String,
    bytes: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read inputs ──────────────────────────────────────────────────────
    let mut files = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        files.push(
            SourceFile::from_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        );
    }

    // ── Build request ────────────────────────────────────────────────────
    let resize = match (cli.width, cli.height) {
        (Some(w), Some(h)) => Some(Resize::new(w, h)),
        _ => None,
    };

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new(files.len()) as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let mut builder = ConversionRequest::builder(cli.format.into())
        .quality(cli.quality)
        .maybe_resize(resize)
        .concurrency(cli.concurrency)
        .policy(cli.policy.into());
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let request = builder.build().context("Invalid request")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_batch(&files, &request)
        .await
        .context("Conversion failed")?;

    // ── Write outputs ────────────────────────────────────────────────────
    tokio::fs::create_dir_all(&cli.outdir)
        .await
        .with_context(|| format!("Failed to create {}", cli.outdir.display()))?;

    for file in &output.files {
        let path = cli.outdir.join(&file.name);
        tokio::fs::write(&path, &file.data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Some(ref zip_path) = cli.zip {
        let archive = package_all(&output.files).context("Failed to build archive")?;
        tokio::fs::write(zip_path, &archive)
            .await
            .with_context(|| format!("Failed to write {}", zip_path.display()))?;
        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} → {}",
                dim(&format!("{} bytes", archive.len())),
                bold(&zip_path.display().to_string())
            );
        }
    }

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let report = JsonReport {
            files: output
                .files
                .iter()
                .map(|f| JsonFile {
                    name: f.name.clone(),
                    bytes: f.data.len(),
                })
                .collect(),
            failures: output.failures.iter().map(|e| e.to_string()).collect(),
            stats: output.stats,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet && !show_progress {
        // Only print inline stats when the progress callback is disabled.
        eprintln!(
            "Converted {}/{} files in {}ms",
            output.stats.converted_files, output.stats.total_files, output.stats.duration_ms
        );
        if output.stats.failed_files > 0 {
            eprintln!("  {} files failed", output.stats.failed_files);
        }
    }

    Ok(())
}

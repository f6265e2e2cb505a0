//! Diagnostics for conversion runs.
//!
//! Conversion never stops for a bad file or a bad item; instead it reports what it skipped to an
//! optional [`ConversionObserver`]. Provided implementations:
//!
//! - [`StdErrObserver`]: human-readable lines on stderr
//! - [`FileObserver`]: timestamped lines appended to a log file
//! - [`TracingObserver`]: `tracing` events, for binaries that install a subscriber
//! - [`CompositeObserver`]: fan-out to several observers

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info, warn};

use crate::aggregate::ConversionReport;
use crate::error::ConversionError;
use crate::projection::Truncation;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (something was skipped or cut short).
    Warning,
    /// Error-level event (a file, an item or the run failed).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl ConversionSeverity {
    /// Severity of an error, used for both per-file skips and run failures.
    pub fn of(error: &ConversionError) -> Self {
        match error {
            ConversionError::Io(_) => Self::Critical,
            ConversionError::Walk(_) => Self::Critical,
            ConversionError::InputDirectory { .. } => Self::Critical,
            ConversionError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            ConversionError::Json { .. } => Self::Error,
            ConversionError::Extraction { .. } => Self::Error,
            ConversionError::Pattern(_) => Self::Error,
            ConversionError::Shape { .. } => Self::Warning,
            ConversionError::NoRecords { .. } => Self::Warning,
        }
    }
}

/// The path an event refers to: a document, the input directory or the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionContext {
    pub path: PathBuf,
}

impl ConversionContext {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// An optional observer plus the severity at which failures are escalated to
/// [`ConversionObserver::on_alert`].
///
/// The document source, the aggregator and the unified entrypoint all report through this.
#[derive(Clone)]
pub struct Diagnostics {
    observer: Option<Arc<dyn ConversionObserver>>,
    alert_at_or_above: ConversionSeverity,
}

impl Diagnostics {
    pub fn new(observer: Option<Arc<dyn ConversionObserver>>, alert_at_or_above: ConversionSeverity) -> Self {
        Self {
            observer,
            alert_at_or_above,
        }
    }

    /// Diagnostics that drop every event.
    pub fn silent() -> Self {
        Self::new(None, ConversionSeverity::Critical)
    }

    pub(crate) fn document_skipped(&self, ctx: &ConversionContext, error: &ConversionError) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        let severity = ConversionSeverity::of(error);
        obs.on_document_skipped(ctx, severity, error);
        if severity >= self.alert_at_or_above {
            obs.on_alert(ctx, severity, error);
        }
    }

    pub(crate) fn shape_warning(&self, ctx: &ConversionContext, error: &ConversionError) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_shape_warning(ctx, error);
        }
    }

    pub(crate) fn item_skipped(&self, ctx: &ConversionContext, index: usize, error: &ConversionError) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_item_skipped(ctx, index, error);
        }
    }

    pub(crate) fn truncated(&self, ctx: &ConversionContext, index: usize, truncation: &Truncation) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_truncated(ctx, index, truncation);
        }
    }

    pub(crate) fn success(&self, ctx: &ConversionContext, report: &ConversionReport) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(ctx, report);
        }
    }

    pub(crate) fn failure(&self, ctx: &ConversionContext, error: &ConversionError) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        let severity = ConversionSeverity::of(error);
        obs.on_failure(ctx, severity, error);
        if severity >= self.alert_at_or_above {
            obs.on_alert(ctx, severity, error);
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Observer interface for conversion diagnostics.
///
/// Every method has a no-op default, so implementors only override what they care about.
pub trait ConversionObserver: Send + Sync {
    /// A document could not be read or parsed and was left out.
    fn on_document_skipped(
        &self,
        _ctx: &ConversionContext,
        _severity: ConversionSeverity,
        _error: &ConversionError,
    ) {
    }

    /// A document parsed, but its root is neither a list nor an object.
    fn on_shape_warning(&self, _ctx: &ConversionContext, _error: &ConversionError) {}

    /// One item of a document could not be projected. `index` is zero-based within the document.
    fn on_item_skipped(&self, _ctx: &ConversionContext, _index: usize, _error: &ConversionError) {}

    /// An item had more array elements than its fixed columns can hold.
    fn on_truncated(&self, _ctx: &ConversionContext, _index: usize, _truncation: &Truncation) {}

    /// The output file was written.
    fn on_success(&self, _ctx: &ConversionContext, _report: &ConversionReport) {}

    /// The run ended without writing output.
    fn on_failure(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &ConversionError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }

    /// Number of wrapped observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observers are wrapped.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_document_skipped(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_document_skipped(ctx, severity, error);
        }
    }

    fn on_shape_warning(&self, ctx: &ConversionContext, error: &ConversionError) {
        for o in &self.observers {
            o.on_shape_warning(ctx, error);
        }
    }

    fn on_item_skipped(&self, ctx: &ConversionContext, index: usize, error: &ConversionError) {
        for o in &self.observers {
            o.on_item_skipped(ctx, index, error);
        }
    }

    fn on_truncated(&self, ctx: &ConversionContext, index: usize, truncation: &Truncation) {
        for o in &self.observers {
            o.on_truncated(ctx, index, truncation);
        }
    }

    fn on_success(&self, ctx: &ConversionContext, report: &ConversionReport) {
        for o in &self.observers {
            o.on_success(ctx, report);
        }
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs conversion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ConversionObserver for StdErrObserver {
    fn on_document_skipped(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        eprintln!("[convert][skip][{:?}] path={} err={}", severity, ctx.path.display(), error);
    }

    fn on_shape_warning(&self, ctx: &ConversionContext, error: &ConversionError) {
        eprintln!("[convert][shape] path={} err={}", ctx.path.display(), error);
    }

    fn on_item_skipped(&self, ctx: &ConversionContext, index: usize, error: &ConversionError) {
        eprintln!("[convert][item] path={} index={} err={}", ctx.path.display(), index, error);
    }

    fn on_truncated(&self, ctx: &ConversionContext, index: usize, truncation: &Truncation) {
        eprintln!(
            "[convert][truncated] path={} index={} list={} len={} kept={}",
            ctx.path.display(),
            index,
            truncation.list,
            truncation.len,
            truncation.limit
        );
    }

    fn on_success(&self, ctx: &ConversionContext, report: &ConversionReport) {
        eprintln!("[convert][ok] path={} {}", ctx.path.display(), report);
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        eprintln!("[convert][{:?}] path={} err={}", severity, ctx.path.display(), error);
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        eprintln!("[ALERT][convert][{:?}] path={} err={}", severity, ctx.path.display(), error);
    }
}

/// Emits conversion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn on_document_skipped(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        error!(path = %ctx.path.display(), ?severity, "skipping document: {error}");
    }

    fn on_shape_warning(&self, ctx: &ConversionContext, error: &ConversionError) {
        warn!(path = %ctx.path.display(), "{error}");
    }

    fn on_item_skipped(&self, ctx: &ConversionContext, index: usize, error: &ConversionError) {
        error!(path = %ctx.path.display(), index, "skipping item: {error}");
    }

    fn on_truncated(&self, ctx: &ConversionContext, index: usize, truncation: &Truncation) {
        warn!(
            path = %ctx.path.display(),
            index,
            list = truncation.list,
            "dropped {} of {} elements past the {} column slots",
            truncation.dropped(),
            truncation.len,
            truncation.limit
        );
    }

    fn on_success(&self, ctx: &ConversionContext, report: &ConversionReport) {
        info!(path = %ctx.path.display(), "data written: {report}");
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        match severity {
            ConversionSeverity::Info => info!(path = %ctx.path.display(), "{error}"),
            ConversionSeverity::Warning => warn!(path = %ctx.path.display(), "{error}"),
            ConversionSeverity::Error | ConversionSeverity::Critical => {
                error!(path = %ctx.path.display(), ?severity, "{error}")
            }
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        error!(path = %ctx.path.display(), ?severity, alert = true, "{error}");
    }
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_document_skipped(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} skip severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_shape_warning(&self, ctx: &ConversionContext, error: &ConversionError) {
        self.append_line(&format!("{} shape path={} err={}", unix_ts(), ctx.path.display(), error));
    }

    fn on_item_skipped(&self, ctx: &ConversionContext, index: usize, error: &ConversionError) {
        self.append_line(&format!(
            "{} item path={} index={} err={}",
            unix_ts(),
            ctx.path.display(),
            index,
            error
        ));
    }

    fn on_truncated(&self, ctx: &ConversionContext, index: usize, truncation: &Truncation) {
        self.append_line(&format!(
            "{} truncated path={} index={} list={} len={} kept={}",
            unix_ts(),
            ctx.path.display(),
            index,
            truncation.list,
            truncation.len,
            truncation.limit
        ));
    }

    fn on_success(&self, ctx: &ConversionContext, report: &ConversionReport) {
        self.append_line(&format!("{} ok path={} {}", unix_ts(), ctx.path.display(), report));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &ConversionError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

//! Unified conversion entrypoint.
//!
//! Most callers should use [`convert_directory`], which runs the whole pipeline:
//!
//! directory → [`DocumentSource`] → [`crate::projection::project`] per item → [`Aggregator`]
//! → [`crate::writer::write_csv_to_path`]
//!
//! Unreadable files, unparseable files, misshapen documents and bad items are reported to the
//! configured observer and skipped. A run ends early only when the input directory or pattern
//! is invalid, when nothing at all was collected ([`ConversionError::NoRecords`], in which case
//! no output file is created), or when the output can not be written.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::aggregate::{Aggregator, ConversionReport};
use crate::error::{ConversionError, ConversionResult};
use crate::observability::{ConversionContext, ConversionObserver, ConversionSeverity, Diagnostics};
use crate::source::{DocumentSource, DEFAULT_PATTERN};
use crate::types::FlatRecord;
use crate::writer::write_csv_to_path;

/// Options controlling a conversion run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Glob matched against file names in the input directory.
    pub pattern: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl ConvertOptions {
    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.observer.clone(), self.alert_at_or_above)
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("pattern", &self.pattern)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// Read every matching document in `dir` and project it into flat records.
///
/// Returns [`ConversionError::NoRecords`] if no record could be produced.
pub fn collect_records(
    dir: impl AsRef<Path>,
    options: &ConvertOptions,
) -> ConversionResult<(Vec<FlatRecord>, ConversionReport)> {
    let dir = dir.as_ref();
    let diagnostics = options.diagnostics();

    let mut source = DocumentSource::open(dir, &options.pattern)?.with_diagnostics(diagnostics.clone());
    let mut aggregator = Aggregator::new(diagnostics);
    for doc in source.by_ref() {
        aggregator.push_document(&doc);
    }

    let report = aggregator.report_mut();
    report.documents_seen += source.skipped();
    report.documents_skipped += source.skipped();

    aggregator.finish(dir)
}

/// Convert every matching document in `input_dir` into one CSV file at `output`.
///
/// When an observer is configured, this function reports:
///
/// - per-file, per-document and per-item skips as they happen
/// - `on_success` with the run's [`ConversionReport`] once the file is written
/// - `on_failure` (and `on_alert`, at or above `options.alert_at_or_above`) when the run ends
///   without output
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use material_table::convert::{convert_directory, ConvertOptions};
/// use material_table::observability::StdErrObserver;
///
/// # fn main() -> Result<(), material_table::ConversionError> {
/// let opts = ConvertOptions {
///     observer: Some(Arc::new(StdErrObserver)),
///     ..Default::default()
/// };
/// let report = convert_directory("materials/", "output.csv", &opts)?;
/// println!("records={}", report.records);
/// # Ok(())
/// # }
/// ```
pub fn convert_directory(
    input_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> ConversionResult<ConversionReport> {
    let input_dir = input_dir.as_ref();
    let output = output.as_ref();
    let diagnostics = options.diagnostics();

    let result = collect_records(input_dir, options).and_then(|(records, report)| {
        write_csv_to_path(output, &records)?;
        Ok(report)
    });

    match &result {
        Ok(report) => diagnostics.success(&ConversionContext::new(output), report),
        Err(err) => {
            let path = match err {
                ConversionError::Csv(_) | ConversionError::Io(_) => output,
                _ => input_dir,
            };
            diagnostics.failure(&ConversionContext::new(path), err);
        }
    }

    result
}

/// Convenience helper for callers that want an owned request object.
#[derive(Clone)]
pub struct ConversionRequest {
    /// Directory holding the input documents.
    pub input_dir: PathBuf,
    /// Path of the CSV file to write.
    pub output: PathBuf,
    /// Options controlling conversion.
    pub options: ConvertOptions,
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("input_dir", &self.input_dir)
            .field("output", &self.output)
            .field("options", &self.options)
            .finish()
    }
}

impl ConversionRequest {
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            options: ConvertOptions::default(),
        }
    }

    /// Execute the request by calling [`convert_directory`].
    pub fn run(&self) -> ConversionResult<ConversionReport> {
        convert_directory(&self.input_dir, &self.output, &self.options)
    }
}

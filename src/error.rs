use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error type returned by conversion functions.
///
/// This is a single error enum shared by document discovery, projection, aggregation and CSV
/// writing. Most variants are recoverable at the smallest unit they describe (one file or one
/// item); see [`crate::convert::convert_directory`] for which ones end a run.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be parsed as JSON.
    #[error("failed to parse '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A directory entry could not be read while enumerating the input directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The file-name pattern in [`crate::convert::ConvertOptions`] is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// CSV writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The document root is neither an array of items nor a single item.
    #[error("document '{}' is not a list or an object (found {kind}); skipping", .path.display())]
    Shape { path: PathBuf, kind: &'static str },

    /// One item could not be projected into a flat record.
    #[error("failed to extract item: {message}")]
    Extraction { message: String },

    /// Nothing was collected across the whole input directory.
    #[error("no valid JSON data found in '{}'", .dir.display())]
    NoRecords { dir: PathBuf },

    /// The input directory is missing or is not a directory.
    #[error("invalid input directory '{}': {message}", .path.display())]
    InputDirectory { path: PathBuf, message: String },
}

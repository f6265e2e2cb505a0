//! Document discovery and parsing.
//!
//! [`DocumentSource`] lists the regular files directly inside a directory (no recursion), in
//! file-name order, keeps the ones whose name matches a glob pattern (`*.json` by default) and
//! yields each one parsed into a JSON tree. Files that can not be read or parsed are reported
//! to [`Diagnostics`] and left out; they never end the iteration.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::{ConversionError, ConversionResult};
use crate::observability::{ConversionContext, Diagnostics};

/// File-name pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.json";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One parsed input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path of the file the tree was parsed from.
    pub path: PathBuf,
    /// Parsed content.
    pub tree: serde_json::Value,
}

/// Parse JSON text; `path` is only used to label errors.
pub fn parse_document(path: impl AsRef<Path>, text: &str) -> ConversionResult<serde_json::Value> {
    parse_document_bytes(path, text.as_bytes())
}

/// Parse raw file content. Bytes that are not valid UTF-8 are a parse error of this document.
pub fn parse_document_bytes(
    path: impl AsRef<Path>,
    bytes: &[u8],
) -> ConversionResult<serde_json::Value> {
    serde_json::from_slice(bytes).map_err(|source| ConversionError::Json {
        path: path.as_ref().to_path_buf(),
        source,
    })
}

/// Read and parse one JSON file.
pub fn read_document(path: impl AsRef<Path>) -> ConversionResult<serde_json::Value> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    parse_document_bytes(path, &bytes)
}

/// Lazy, single-pass sequence of parsed documents from one directory.
pub struct DocumentSource {
    entries: walkdir::IntoIter,
    pattern: Pattern,
    diagnostics: Diagnostics,
    seen: usize,
    skipped: usize,
}

impl DocumentSource {
    /// Open `dir` for reading files whose name matches `pattern`.
    ///
    /// Fails if `dir` is not an existing directory or `pattern` is not a valid glob. Nothing is
    /// read until the source is iterated.
    pub fn open(dir: impl AsRef<Path>, pattern: &str) -> ConversionResult<Self> {
        let dir = dir.as_ref();
        let meta = fs::metadata(dir).map_err(|e| ConversionError::InputDirectory {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(ConversionError::InputDirectory {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let pattern = Pattern::new(pattern)?;
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            entries,
            pattern,
            diagnostics: Diagnostics::silent(),
            seen: 0,
            skipped: 0,
        })
    }

    /// Report skipped files to `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Number of matching files encountered so far (parsed or not).
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of matching files that could not be read or parsed so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn matches(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_file() && self.name_matches(entry.path())
    }

    fn name_matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
    }
}

impl Iterator for DocumentSource {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    // Broken entries are only reported when their name would have been a
                    // candidate. Depth 0 is the input directory itself failing to list.
                    let candidate =
                        err.depth() == 0 || err.path().is_some_and(|path| self.name_matches(path));
                    if !candidate {
                        continue;
                    }
                    let ctx = ConversionContext::new(err.path().unwrap_or(Path::new("")));
                    self.seen += 1;
                    self.skipped += 1;
                    self.diagnostics.document_skipped(&ctx, &ConversionError::Walk(err));
                    continue;
                }
            };
            if !self.matches(&entry) {
                continue;
            }

            self.seen += 1;
            match read_document(entry.path()) {
                Ok(tree) => {
                    return Some(Document {
                        path: entry.into_path(),
                        tree,
                    });
                }
                Err(err) => {
                    self.skipped += 1;
                    self.diagnostics
                        .document_skipped(&ConversionContext::new(entry.path()), &err);
                }
            }
        }
    }
}

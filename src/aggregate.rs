//! Record aggregation across documents.
//!
//! The [`Aggregator`] turns parsed documents into flat records in encounter order: documents in
//! the order they arrive, items in array order within a list-valued document. There is no
//! sorting or de-duplication. Bad documents and bad items are reported and skipped one at a time.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};
use crate::lookup::value_kind;
use crate::observability::{ConversionContext, Diagnostics};
use crate::projection::project;
use crate::source::Document;
use crate::types::FlatRecord;

/// Counts for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Matching files encountered.
    pub documents_seen: usize,
    /// Matching files left out (unreadable, unparseable or neither a list nor an object).
    pub documents_skipped: usize,
    /// Items found in accepted documents.
    pub items_seen: usize,
    /// Items that could not be projected.
    pub items_skipped: usize,
    /// Flat records produced.
    pub records: usize,
    /// Items that had array elements dropped past their column slots.
    pub truncations: usize,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "documents={} (skipped {}), items={} (skipped {}), records={}, truncated_items={}",
            self.documents_seen,
            self.documents_skipped,
            self.items_seen,
            self.items_skipped,
            self.records,
            self.truncations
        )
    }
}

/// Collects flat records from documents, preserving encounter order.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<FlatRecord>,
    report: ConversionReport,
    diagnostics: Diagnostics,
}

impl Aggregator {
    /// Create an empty aggregator that reports skips to `diagnostics`.
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            records: Vec::new(),
            report: ConversionReport::default(),
            diagnostics,
        }
    }

    /// Project every item of `doc` and append the results.
    ///
    /// A list yields one record per projectable element; an object yields one record; any other
    /// root is reported as a shape warning and yields nothing. Returns the number of records
    /// added.
    pub fn push_document(&mut self, doc: &Document) -> usize {
        self.push_tree(&doc.path, &doc.tree)
    }

    /// Same as [`Self::push_document`] for a tree that did not come from a [`Document`].
    pub fn push_tree(&mut self, path: &Path, tree: &Value) -> usize {
        let ctx = ConversionContext::new(path);
        let before = self.records.len();
        self.report.documents_seen += 1;

        match tree {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.push_item(&ctx, index, item);
                }
            }
            Value::Object(_) => self.push_item(&ctx, 0, tree),
            other => {
                self.report.documents_skipped += 1;
                let err = ConversionError::Shape {
                    path: path.to_path_buf(),
                    kind: value_kind(other),
                };
                self.diagnostics.shape_warning(&ctx, &err);
            }
        }

        self.records.len() - before
    }

    fn push_item(&mut self, ctx: &ConversionContext, index: usize, item: &Value) {
        self.report.items_seen += 1;
        match project(item) {
            Ok(projection) => {
                if !projection.truncations.is_empty() {
                    self.report.truncations += 1;
                }
                for truncation in &projection.truncations {
                    self.diagnostics.truncated(ctx, index, truncation);
                }
                self.records.push(projection.record);
                self.report.records += 1;
            }
            Err(err) => {
                self.report.items_skipped += 1;
                self.diagnostics.item_skipped(ctx, index, &err);
            }
        }
    }

    /// Records collected so far.
    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    /// Counts so far.
    pub fn report(&self) -> ConversionReport {
        self.report
    }

    /// Mutable access to the counts, for callers that track documents skipped before parsing.
    pub fn report_mut(&mut self) -> &mut ConversionReport {
        &mut self.report
    }

    /// Finish aggregation.
    ///
    /// Returns [`ConversionError::NoRecords`] if nothing was collected; `dir` names the input
    /// in that error.
    pub fn finish(self, dir: impl AsRef<Path>) -> ConversionResult<(Vec<FlatRecord>, ConversionReport)> {
        if self.records.is_empty() {
            return Err(ConversionError::NoRecords {
                dir: dir.as_ref().to_path_buf(),
            });
        }
        Ok((self.records, self.report))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::Aggregator;
    use crate::error::ConversionError;
    use crate::types::Cell;

    #[test]
    fn list_then_object_preserves_order() {
        let mut agg = Aggregator::default();
        let list = json!([
            {"name": {"translate": "material.silentgear.a"}},
            {"name": {"translate": "material.silentgear.b"}}
        ]);
        let single = json!({"name": {"translate": "material.silentgear.c"}});

        assert_eq!(agg.push_tree(Path::new("1.json"), &list), 2);
        assert_eq!(agg.push_tree(Path::new("2.json"), &single), 1);

        let names: Vec<_> = agg
            .records()
            .iter()
            .map(|r| r.get("name").cloned().unwrap())
            .collect();
        assert_eq!(names, vec![Cell::from("a"), Cell::from("b"), Cell::from("c")]);
    }

    #[test]
    fn bad_items_and_shapes_are_skipped_individually() {
        let mut agg = Aggregator::default();
        assert_eq!(agg.push_tree(Path::new("mixed.json"), &json!([{}, 4, {}])), 2);
        assert_eq!(agg.push_tree(Path::new("scalar.json"), &json!("text")), 0);

        let report = agg.report();
        assert_eq!(report.documents_seen, 2);
        assert_eq!(report.documents_skipped, 1);
        assert_eq!(report.items_seen, 3);
        assert_eq!(report.items_skipped, 1);
        assert_eq!(report.records, 2);
    }

    #[test]
    fn empty_aggregate_is_no_records() {
        let mut agg = Aggregator::default();
        agg.push_tree(Path::new("empty.json"), &json!([]));
        let err = agg.finish("in").unwrap_err();
        assert!(matches!(err, ConversionError::NoRecords { .. }));
    }
}

//! CSV output.
//!
//! The header is taken from the first record's column names; every record is then written as
//! one row in the same order. Nulls become empty fields, and fields containing the delimiter,
//! a quote or a line break are quoted. Rows end with `\n` on every platform.

use std::io;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ConversionResult;
use crate::types::FlatRecord;

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'));
    builder
}

/// Write `records` as CSV to a new file at `path`, replacing any existing file.
///
/// Returns the number of data rows written. An empty `records` slice writes nothing and does
/// not create the file.
pub fn write_csv_to_path(path: impl AsRef<Path>, records: &[FlatRecord]) -> ConversionResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let mut wtr = builder().from_path(path)?;
    write_records(&mut wtr, records)
}

/// Write `records` as CSV into any [`io::Write`].
pub fn write_csv_to_writer<W: io::Write>(out: W, records: &[FlatRecord]) -> ConversionResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let mut wtr = builder().from_writer(out);
    write_records(&mut wtr, records)
}

/// Write a header plus one row per record into an existing CSV writer, then flush it.
pub fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, records: &[FlatRecord]) -> ConversionResult<usize> {
    let Some(first) = records.first() else {
        return Ok(0);
    };

    wtr.write_record(first.column_names())?;
    for record in records {
        wtr.write_record(record.values().iter().map(|cell| cell.to_string()))?;
    }
    wtr.flush()?;

    Ok(records.len())
}

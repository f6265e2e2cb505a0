//! Field projection: one item document in, one [`FlatRecord`] out.
//!
//! Projection walks the declarative tables in [`crate::schema`]:
//!
//! 1. resolve each [`SectionId`] once (missing or non-mapping sections resolve to empty)
//! 2. fill every scalar column by key lookup in its section (absent keys become nulls)
//! 3. strip [`NAME_PREFIX`] from the `name` column
//! 4. spread each [`Expansion`] array over its fixed slots, padding with nulls and dropping
//!    elements past the limit (reported as a [`Truncation`])
//!
//! Lookups never fail. The only item that can not be projected is one that is not a JSON object.

use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};
use crate::lookup::{value_kind, Lookup, Section};
use crate::schema::{
    column_schema, Expansion, ScalarColumn, SectionId, SlotValue, EXPANSIONS, NAME_PREFIX,
    SCALAR_COLUMNS,
};
use crate::types::{Cell, FlatRecord};

const NAME_COLUMN: &str = "name";

/// Elements dropped from an array because it was longer than its expansion limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Dot path of the truncated array (e.g. `traits.main`).
    pub list: &'static str,
    /// Length of the source array.
    pub len: usize,
    /// Number of slots kept.
    pub limit: usize,
}

impl Truncation {
    /// Number of elements that did not make it into the record.
    pub fn dropped(&self) -> usize {
        self.len.saturating_sub(self.limit)
    }
}

/// Output of [`project`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The flattened item.
    pub record: FlatRecord,
    /// Arrays that were cut down to their slot limit.
    pub truncations: Vec<Truncation>,
}

impl Projection {
    /// Discard truncation details.
    pub fn into_record(self) -> FlatRecord {
        self.record
    }
}

/// Project one item into a flat record.
///
/// The item is only read. Returns [`ConversionError::Extraction`] if the item is not a JSON
/// object; every other irregularity (missing sections, wrong types, short arrays) is absorbed
/// as nulls.
pub fn project(item: &Value) -> ConversionResult<Projection> {
    if !item.is_object() {
        return Err(ConversionError::Extraction {
            message: format!("expected an object, found {}", value_kind(item)),
        });
    }

    let sections = SectionId::ALL.map(|id| Section::resolve(item, id.path()));
    let schema = column_schema();
    let mut values = Vec::with_capacity(schema.len());

    for column in SCALAR_COLUMNS {
        let cell = scalar_value(&sections, column);
        if column.name == NAME_COLUMN {
            values.push(normalize_name(cell));
        } else {
            values.push(cell);
        }
    }

    let mut truncations = Vec::new();
    for expansion in EXPANSIONS {
        let items = Lookup::root(item).path(expansion.list).as_slice();
        expand_into(&mut values, expansion, items);
        if items.len() > expansion.limit {
            truncations.push(Truncation {
                list: expansion.list,
                len: items.len(),
                limit: expansion.limit,
            });
        }
    }

    Ok(Projection {
        record: FlatRecord::new(schema, values),
        truncations,
    })
}

fn scalar_value(sections: &[Section<'_>], column: &ScalarColumn) -> Cell {
    let section = &sections[column.section.slot()];
    let Some((first, rest)) = column.keys.split_first() else {
        return Cell::Null;
    };
    rest.iter()
        .fold(section.get(first), |found, key| found.key(key))
        .to_cell()
}

/// Strip the `material.silentgear.` prefix from string names; anything else passes through.
pub fn normalize_name(cell: Cell) -> Cell {
    match cell {
        Cell::Utf8(s) => match s.strip_prefix(NAME_PREFIX) {
            Some(stripped) => Cell::Utf8(stripped.to_string()),
            None => Cell::Utf8(s),
        },
        other => other,
    }
}

fn expand_into(values: &mut Vec<Cell>, expansion: &Expansion, items: &[Value]) {
    for idx in 0..expansion.limit {
        let element = items.get(idx);
        for field in expansion.fields {
            let cell = match (element, field.value) {
                (None, _) => Cell::Null,
                (Some(el), SlotValue::Key(key)) => Lookup::root(el).key(key).to_cell(),
                (Some(el), SlotValue::Element) => Cell::from_json(el),
            };
            values.push(cell);
        }
    }
}

//! Core data model types for conversion.
//!
//! Every projected item becomes a [`FlatRecord`]: a row of [`Cell`]s laid out in the order of a
//! shared, immutable [`ColumnSchema`].

use std::fmt;
use std::sync::Arc;

/// A single scalar value in a [`FlatRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value. Rendered as an empty CSV field.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Cell {
    /// Convert a JSON value into a cell.
    ///
    /// Scalars map onto the matching variant. Integers that do not fit in `i64` keep their
    /// decimal text. Mappings and arrays are kept as compact JSON text.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::String(s) => Self::Utf8(s.clone()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int64(i)
                } else if n.is_u64() {
                    Self::Utf8(n.to_string())
                } else {
                    n.as_f64().map(Self::Float64).unwrap_or(Self::Null)
                }
            }
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Utf8(v.to_string()),
        }
    }

    /// Returns `true` for [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string payload of a [`Cell::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write_float(f, *v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip form with a trailing `.0` on whole values (`6.0`). Exponents carry a sign
/// and at least two digits (`1e+20`, `1.5e-07`).
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let text = format!("{v:?}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return f.write_str(&text);
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{mantissa}e{sign}{digits:0>2}")
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Utf8(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

/// The fixed, ordered list of output column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Create a schema from column names, in output order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The tabular projection of one item.
///
/// Values are stored in the same order as the [`ColumnSchema`] columns, so every record built
/// against the same schema has the same column set in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    schema: Arc<ColumnSchema>,
    values: Vec<Cell>,
}

impl FlatRecord {
    /// Create a record with every column set to [`Cell::Null`].
    pub fn null(schema: Arc<ColumnSchema>) -> Self {
        let values = vec![Cell::Null; schema.len()];
        Self { schema, values }
    }

    /// Create a record from a full row of values.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per schema column.
    pub fn new(schema: Arc<ColumnSchema>, values: Vec<Cell>) -> Self {
        assert!(
            values.len() == schema.len(),
            "record length {} does not match schema length {}",
            values.len(),
            schema.len()
        );
        Self { schema, values }
    }

    /// Schema this record was built against.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.schema.index_of(column).map(|idx| &self.values[idx])
    }

    /// Set a value by column name. Returns `false` if the column is not part of the schema.
    pub fn set(&mut self, column: &str, value: Cell) -> bool {
        match self.schema.index_of(column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.column_names()
    }

    /// Values in column order.
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.schema.column_names().zip(self.values.iter())
    }
}

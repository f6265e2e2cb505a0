//! Safe nested lookups into parsed JSON documents.
//!
//! A lookup that walks off the document (missing key, non-mapping parent, index out of range)
//! yields [`Lookup::Absent`], which is kept distinct from a key that is present with a JSON
//! `null` value ([`Lookup::Present`] of `Value::Null`). Both render as [`Cell::Null`].

use serde_json::{Map, Value};

use crate::types::Cell;

/// Result of a nested lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Some path segment did not resolve.
    Absent,
    /// The path resolved to this value (which may itself be `null`).
    Present(&'a Value),
}

impl<'a> Lookup<'a> {
    /// Start a lookup at `root`.
    pub fn root(root: &'a Value) -> Self {
        Self::Present(root)
    }

    /// Descend into a mapping key.
    pub fn key(self, key: &str) -> Self {
        match self {
            Self::Present(Value::Object(map)) => map.get(key).map_or(Self::Absent, Self::Present),
            _ => Self::Absent,
        }
    }

    /// Descend into an array element.
    pub fn index(self, idx: usize) -> Self {
        match self {
            Self::Present(Value::Array(items)) => items.get(idx).map_or(Self::Absent, Self::Present),
            _ => Self::Absent,
        }
    }

    /// Descend along a dot-separated key path (e.g. `stats.main`).
    pub fn path(self, path: &str) -> Self {
        path.split('.').fold(self, Lookup::key)
    }

    /// Returns `true` if the lookup did not resolve.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The resolved value, if any.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// The resolved mapping, if the value is one.
    pub fn as_object(self) -> Option<&'a Map<String, Value>> {
        self.value().and_then(Value::as_object)
    }

    /// The resolved array, or an empty slice if absent or not an array.
    pub fn as_slice(self) -> &'a [Value] {
        match self.value() {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// Render as a [`Cell`]; absent lookups become [`Cell::Null`].
    pub fn to_cell(self) -> Cell {
        self.value().map_or(Cell::Null, Cell::from_json)
    }
}

/// Short name of a JSON value's type, for diagnostics.
pub fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A resolved sub-mapping of a document.
///
/// Resolves to an empty section when any path segment is missing or is not a mapping, so
/// every key lookup on it is simply [`Lookup::Absent`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Section<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    /// Resolve the mapping at `path` below `root`.
    pub fn resolve(root: &'a Value, path: &str) -> Self {
        Self {
            map: Lookup::root(root).path(path).as_object(),
        }
    }

    /// Look up a direct key of this section.
    pub fn get(&self, key: &str) -> Lookup<'a> {
        self.map
            .and_then(|m| m.get(key))
            .map_or(Lookup::Absent, Lookup::Present)
    }

    /// Returns `true` if the section did not resolve to a mapping (or the mapping is empty).
    pub fn is_empty(&self) -> bool {
        self.map.is_none_or(Map::is_empty)
    }
}

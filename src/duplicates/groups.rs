//! Duplicate keys and the report that groups records by them.
//!
//! # Overview
//!
//! A [`KeySpec`] is a resolved, ordered list of record fields. The key of a
//! row is the string form of each field joined with [`KEY_SEPARATOR`].
//!
//! A [`DuplicateReport`] maps every key seen to the rows beyond the first
//! that share it. Keys keep the order they were first seen in, and a key
//! seen once maps to an empty list rather than being dropped.
//!
//! # Example
//!
//! ```
//! use rowdupe::duplicates::{DuplicateReport, KeySpec};
//! use serde_json::json;
//!
//! let spec = KeySpec::resolve(&["user", "age"]).unwrap();
//! let rows = json!([
//!     {"user": "A", "age": 1, "lang_id": 1, "row_id": 1, "balance": 10},
//!     {"user": "A", "age": 1, "lang_id": 2, "row_id": 2, "balance": 20},
//! ]);
//!
//! let mut report = DuplicateReport::new();
//! for row in rows.as_array().unwrap() {
//!     let row = row.as_object().unwrap();
//!     report.observe(spec.key_for(row).unwrap(), row).unwrap();
//! }
//!
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.get("A | 1").unwrap()[0].duplicate_row_id, 2);
//! ```

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DedupError;
use crate::record::{Field, Row};

/// Separator placed between field values in a duplicate key.
pub const KEY_SEPARATOR: &str = " | ";

/// Fields checked when the caller does not choose any.
pub const DEFAULT_UNIQUE_FIELDS: [&str; 3] = ["user", "age", "lang_id"];

/// The ordered fields a duplicate key is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    fields: Vec<Field>,
}

impl KeySpec {
    /// Create a key spec from already resolved fields.
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Resolve field names, in order.
    ///
    /// An empty list is accepted and gives every row the empty key.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Lookup`] for the first name that is not a
    /// record field.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Self, DedupError> {
        let fields = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Field::from_name(name).ok_or_else(|| DedupError::unknown_field(name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    /// The resolved fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Build the duplicate key of `row`.
    ///
    /// # Errors
    ///
    /// Returns the first field of the spec that `row` lacks.
    pub fn key_for(&self, row: &Row) -> Result<String, Field> {
        let parts = self
            .fields
            .iter()
            .map(|&field| field.render(row).ok_or(field))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(KEY_SEPARATOR))
    }
}

impl Default for KeySpec {
    fn default() -> Self {
        Self::new(vec![Field::User, Field::Age, Field::LangId])
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|field| field.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

/// A row that repeats the key of an earlier row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// `row_id` of the repeating row, as found in the source
    pub duplicate_row_id: Value,
    /// The repeating row in full, extra keys included
    pub duplicate_row: Row,
}

impl DuplicateEntry {
    /// Entry for `row`.
    ///
    /// # Errors
    ///
    /// Returns [`Field::RowId`] if `row` has no `row_id`.
    pub fn of(row: &Row) -> Result<Self, Field> {
        let row_id = Field::RowId.lookup(row).ok_or(Field::RowId)?;
        Ok(Self {
            duplicate_row_id: row_id.clone(),
            duplicate_row: row.clone(),
        })
    }
}

/// Mapping from duplicate key to the repeat occurrences of that key.
///
/// Serializes as a JSON object in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateReport {
    groups: IndexMap<String, Vec<DuplicateEntry>>,
}

impl DuplicateReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `row` under `key`.
    ///
    /// The first row seen for a key only registers the key; every later
    /// one is appended as a [`DuplicateEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`Field::RowId`] if a repeating row has no `row_id`. The
    /// report is left unchanged.
    pub fn observe(&mut self, key: String, row: &Row) -> Result<(), Field> {
        match self.groups.entry(key) {
            Entry::Occupied(mut group) => group.get_mut().push(DuplicateEntry::of(row)?),
            Entry::Vacant(group) => {
                group.insert(Vec::new());
            }
        }
        Ok(())
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no key has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Repeat occurrences recorded for `key`, if the key was seen.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[DuplicateEntry]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Keys and their entries, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DuplicateEntry])> {
        self.groups
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Total repeat occurrences across all keys.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Keys that have at least one repeat occurrence.
    pub fn duplicated_keys(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(key, _)| key)
    }
}

//! User records and named field access.
//!
//! [`Record`] is the typed form the generator produces. A source file read
//! back for checking is a list of [`Row`]s instead: plain JSON objects, kept
//! whole so that extra keys survive into the report and a key that is absent
//! only fails when a duplicate key actually needs it.
//!
//! [`Field`] is the closed set of record attributes a duplicate key can be
//! built from. Names are resolved through an explicit table instead of
//! reflection, and each field renders its value with the same string form
//! used in report keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as read from a source file, in file key order.
pub type Row = serde_json::Map<String, Value>;

/// One user entry with identity (`row_id`) and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// User name (not unique)
    pub user: String,
    /// Age in years (not unique)
    pub age: u32,
    /// Language identifier (not unique)
    pub lang_id: u32,
    /// Sequential identifier, unique within a collection, starting at 1
    pub row_id: u64,
    /// Random account balance
    pub balance: i64,
}

impl Record {
    /// The record as a [`Row`], keys in serialization order.
    #[must_use]
    pub fn to_row(&self) -> Row {
        Field::ALL
            .into_iter()
            .map(|field| (field.name().to_string(), field.value(self)))
            .collect()
    }
}

/// A record attribute addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    User,
    Age,
    LangId,
    RowId,
    Balance,
}

impl Field {
    /// All fields, in serialization order.
    pub const ALL: [Field; 5] = [
        Field::User,
        Field::Age,
        Field::LangId,
        Field::RowId,
        Field::Balance,
    ];

    /// The field's name as it appears in source files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::User => "user",
            Field::Age => "age",
            Field::LangId => "lang_id",
            Field::RowId => "row_id",
            Field::Balance => "balance",
        }
    }

    /// Look up a field by its exact name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// The known field name closest to `name`, if any is similar enough.
    ///
    /// Used to enrich lookup errors, e.g. `lang` suggests `lang_id`.
    #[must_use]
    pub fn suggest(name: &str) -> Option<&'static str> {
        Self::ALL
            .into_iter()
            .map(|field| (field.name(), strsim::jaro_winkler(name, field.name())))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }

    /// This field of `record` as a JSON value.
    #[must_use]
    pub fn value(self, record: &Record) -> Value {
        match self {
            Field::User => Value::from(record.user.as_str()),
            Field::Age => Value::from(record.age),
            Field::LangId => Value::from(record.lang_id),
            Field::RowId => Value::from(record.row_id),
            Field::Balance => Value::from(record.balance),
        }
    }

    /// This field's value in `row`, if the row has it.
    #[must_use]
    pub fn lookup(self, row: &Row) -> Option<&Value> {
        row.get(self.name())
    }

    /// Render this field of `row` in its key string form.
    ///
    /// Strings render verbatim, every other value in its JSON form.
    #[must_use]
    pub fn render(self, row: &Row) -> Option<String> {
        self.lookup(row).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

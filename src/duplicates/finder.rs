//! Duplicate checker over a persisted source collection.
//!
//! # Overview
//!
//! [`Checker::check`] runs the whole pipeline:
//! 1. **Resolve** - turn the requested field names into a [`KeySpec`]
//! 2. **Read** - load the full source collection into memory
//! 3. **Group** - one pass over the rows in file order (see [`Checker::find_duplicates`])
//! 4. **Save** - write the [`DuplicateReport`] to its destination
//!
//! Rows are read as plain JSON objects. Only the fields of the key, and the
//! `row_id` of repeating rows, have to be present; a row lacking one of them
//! aborts the check with a lookup error.
//!
//! Any failure aborts the run before the save step, so the destination
//! is either fully replaced or left untouched.

use std::path::Path;

use crate::error::DedupError;
use crate::logging::Journal;
use crate::record::Row;
use crate::store;

use super::groups::{DuplicateReport, KeySpec};

/// Default destination of the duplicate report.
pub const DEFAULT_REPORT_FILE: &str = "duplicates.json";

/// Finds records sharing a duplicate key.
///
/// # Example
///
/// ```no_run
/// use rowdupe::duplicates::Checker;
/// use rowdupe::logging::LogJournal;
/// use std::path::Path;
///
/// let journal = LogJournal::default();
/// let checker = Checker::new(&journal);
/// let report = checker
///     .check(
///         &["user", "age", "lang_id"],
///         Path::new("source.json"),
///         Path::new("duplicates.json"),
///     )
///     .unwrap();
///
/// println!("{} keys, {} duplicate rows", report.len(), report.duplicate_count());
/// ```
pub struct Checker<'j> {
    journal: &'j dyn Journal,
}

impl<'j> Checker<'j> {
    /// Create a checker reporting through `journal`.
    #[must_use]
    pub fn new(journal: &'j dyn Journal) -> Self {
        Self { journal }
    }

    /// Group `rows` by the key `spec` builds, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Lookup`] naming the first row that lacks a key
    /// field, or a repeating row that lacks `row_id`.
    pub fn find_duplicates(
        &self,
        rows: &[Row],
        spec: &KeySpec,
    ) -> Result<DuplicateReport, DedupError> {
        let mut report = DuplicateReport::new();
        for (index, row) in rows.iter().enumerate() {
            spec.key_for(row)
                .and_then(|key| report.observe(key, row))
                .map_err(|field| DedupError::missing_field(field, index + 1))?;
        }
        Ok(report)
    }

    /// Check `source` for records sharing `unique_fields` and write the
    /// report to `destination`.
    ///
    /// # Errors
    ///
    /// - [`DedupError::Lookup`] if a field name is not a record field, or a
    ///   row lacks one of the fields
    /// - [`DedupError::Read`] if `source` is missing, unreadable or malformed
    /// - [`DedupError::Persistence`] if `destination` cannot be written
    ///
    /// No report is written when any of these occur before the save.
    pub fn check<S: AsRef<str>>(
        &self,
        unique_fields: &[S],
        source: &Path,
        destination: &Path,
    ) -> Result<DuplicateReport, DedupError> {
        let spec = KeySpec::resolve(unique_fields).inspect_err(|err| self.journal.failure(err))?;
        self.journal
            .info(&format!("Checking uniqueness of fields: {}", spec));

        let rows: Vec<Row> = store::read_json(source, self.journal)?;
        let report = self
            .find_duplicates(&rows, &spec)
            .inspect_err(|err| self.journal.failure(err))?;
        store::save_json(&report, destination, self.journal)?;

        self.journal.info(&format!(
            "Checked {} records: {} keys, {} duplicate rows",
            rows.len(),
            report.len(),
            report.duplicate_count()
        ));
        Ok(report)
    }
}

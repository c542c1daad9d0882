//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Building duplicate keys from a chosen list of record fields
//! - Grouping records by key into a duplicate report
//! - Checking a persisted source collection and saving the report

pub mod finder;
pub mod groups;

pub use finder::{Checker, DEFAULT_REPORT_FILE};
pub use groups::{DuplicateEntry, DuplicateReport, KeySpec, DEFAULT_UNIQUE_FIELDS, KEY_SEPARATOR};

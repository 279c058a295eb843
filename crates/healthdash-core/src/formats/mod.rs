//! Source table abstraction
//!
//! A `SourceReader` turns a raw indicator file into long-form `SourceRecord`s
//! (one country/year/metric/value per row). The primary loader only depends on
//! this trait, so other tabular formats can be added without touching it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

pub mod csv;
pub mod validation;

pub use self::csv::CsvSourceReader;
pub use validation::{SourceValidation, SourceValidator};

/// Source reader trait that all table formats implement
pub trait SourceReader {
    /// Read the whole table from the given path
    ///
    /// Fails with `SourceUnavailable` when the file cannot be read and with
    /// `SourceMalformed` when its structure does not match the expected layout.
    fn read(&self, path: &Path) -> Result<SourceTable>;

    /// Get supported file extensions (e.g., ["csv", "tsv"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name
    fn format_name(&self) -> &str;

    /// Validate file structure without a full read
    fn validate(&self, path: &Path) -> SourceValidation {
        SourceValidator::validate_file_exists(path)
    }
}

/// Character encoding of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1, as produced by some spreadsheet exports
    Latin1,
}

impl SourceEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Latin1 => "latin-1",
        }
    }
}

/// Names of the source columns holding each field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub country: String,
    pub year: String,
    pub metric: String,
    pub value: String,
}

impl Default for ColumnMapping {
    /// Column names of the WHO Global Health Observatory CSV export
    fn default() -> Self {
        Self {
            country: "COUNTRY".to_string(),
            year: "YEAR".to_string(),
            metric: "GHO (DISPLAY)".to_string(),
            value: "Numeric".to_string(),
        }
    }
}

/// Keep only rows whose `column` equals `equals`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub equals: String,
}

/// Options controlling how a source table is parsed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLayout {
    pub delimiter: u8,
    pub encoding: SourceEncoding,
    pub columns: ColumnMapping,
    pub row_filter: Option<RowFilter>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: SourceEncoding::Utf8,
            columns: ColumnMapping::default(),
            row_filter: None,
        }
    }
}

/// One long-form row of the source table
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub country: String,
    pub year: i32,
    pub metric: String,
    pub value: f64,
}

/// Parsed source table
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    /// Table name, taken from the file stem
    pub name: String,

    pub records: Vec<SourceRecord>,

    /// Rows dropped by the row filter
    pub filtered_out: usize,
}

//! TIP (Typed Input Parser)
//!
//! Loads flat delimited text (CSV-like) straight into typed columnar memory.
//! One pass over the input splits records and fields, converts every field
//! to its column's declared type (integer, float or string) and appends it
//! to a per-column growable array. String columns use a single flat byte
//! buffer plus an end-offset array instead of one allocation per value.
//!
//! ```
//! use tip::{parse, ColumnType};
//!
//! let types = [ColumnType::Integer, ColumnType::Float, ColumnType::String];
//! let parsed = parse(b"1,2.5,abc\n3,4.5,de\n", &types, b',', b'\n', 0).unwrap();
//! assert_eq!(parsed.record_count, 2);
//! assert_eq!(parsed.columns.get_int(0, 1), Some(3));
//! assert_eq!(parsed.columns.get_str(2, 0), Some("abc"));
//! ```
//!
//! Files are memory-mapped for the duration of the parse; see
//! [`parse_file`] and [`parse_path`].

pub mod columns;
pub mod config;
pub mod error;
pub mod parser;
pub mod source;
pub mod stats;

use std::fs::File;
use std::path::Path;

pub use columns::{Column, ColumnSet, ColumnType, FieldValue, FloatColumn, IntColumn, StringColumn};
pub use config::{MalformedPolicy, ParseOptions, TrailingRecord};
pub use error::{Result, TipError};
pub use parser::{estimate_rows, parse, parse_with, Parsed};
pub use source::{file_size, Source};
pub use stats::{ParseStats, TrailingPartial};

/// Parse the full contents of `file` with default policies.
pub fn parse_file(
    file: &File,
    types: &[ColumnType],
    delim: u8,
    eordelim: u8,
    skiprecs: u64,
) -> Result<Parsed> {
    let options = ParseOptions::new(types.to_vec())
        .delimiter(delim)
        .record_delimiter(eordelim)
        .skip_records(skiprecs);
    parse_file_with(file, &options)
}

/// Parse the full contents of `file`.
///
/// Options are validated before the file is touched. The file is mapped
/// read-only and unmapped before this function returns, whether the parse
/// succeeded or not.
pub fn parse_file_with(file: &File, options: &ParseOptions) -> Result<Parsed> {
    options.validate()?;
    let source = Source::from_file(file)?;
    parse_with(&source, options)
}

/// Open `path` and parse it.
pub fn parse_path(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Parsed> {
    let file = File::open(path.as_ref())?;
    parse_file_with(&file, options)
}

/// Release every column of `columns` at once.
pub fn free_columns(columns: ColumnSet) {
    columns.free();
}

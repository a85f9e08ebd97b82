//! Parse configuration and tuning constants.
//!
//! `ParseOptions` carries everything a single parse call needs: the column
//! descriptors, the two delimiter bytes, the number of leading records to
//! skip, and the policies for malformed input. Options can be built in code
//! or loaded from a JSON file:
//!
//! ```json
//! {
//!   "types": ["int", "float", "str"],
//!   "delimiter": ",",
//!   "record_delimiter": "\n",
//!   "skip_records": 1,
//!   "malformed": "abort"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns::ColumnType;
use crate::error::{Result, TipError};

// ── Constants ──────────────────────────────────────────────────────

/// Row capacity used when nothing better is known about the input.
pub const DEFAULT_INITIAL_ROWS: usize = 1024;

/// Smallest capacity a column is ever grown to.
pub const MIN_CAPACITY: usize = 16;

/// Geometric growth factor for row and byte capacity.
pub const GROWTH_FACTOR: usize = 2;

/// Initial byte capacity reserved per row for string columns.
pub const DEFAULT_STRING_BYTES: usize = 16;

/// Number of leading bytes sampled to estimate the record count (64 KB).
pub const ESTIMATE_SAMPLE_BYTES: usize = 64 * 1024;

/// Upper bound for an estimated initial row capacity. Past this point the
/// columns grow on demand instead of trusting the sample.
pub const MAX_INITIAL_ROWS: usize = 16 * 1024 * 1024;

// ── Policies ───────────────────────────────────────────────────────

/// What to do with a non-empty numeric field that fails to parse, or with a
/// record whose field count differs from the number of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Store the column's sentinel and keep going. Short records are padded
    /// with sentinels, extra fields are ignored.
    #[default]
    Sentinel,
    /// Fail the whole parse on the first offending field or record.
    Abort,
}

/// What to do with bytes after the last record delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingRecord {
    /// Materialize the unterminated tail as a final record.
    #[default]
    Parse,
    /// Ignore the unterminated tail.
    Drop,
}

// ── ParseOptions ───────────────────────────────────────────────────

/// Options for a single parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Declared type per column; `types.len()` is the column count.
    pub types: Vec<ColumnType>,

    /// Field delimiter byte.
    #[serde(default = "default_delimiter", with = "byte_char")]
    pub delimiter: u8,

    /// Record delimiter byte.
    #[serde(default = "default_record_delimiter", with = "byte_char")]
    pub record_delimiter: u8,

    /// Leading records scanned and discarded (header rows).
    #[serde(default)]
    pub skip_records: u64,

    #[serde(default)]
    pub malformed: MalformedPolicy,

    #[serde(default)]
    pub trailing: TrailingRecord,

    /// Initial row capacity. Estimated from the input when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_rows: Option<usize>,

    /// Value stored for empty or coerced integer fields.
    #[serde(default)]
    pub int_sentinel: i64,

    /// Value stored for empty or coerced float fields.
    #[serde(default)]
    pub float_sentinel: f64,
}

fn default_delimiter() -> u8 {
    b','
}

fn default_record_delimiter() -> u8 {
    b'\n'
}

impl ParseOptions {
    /// Comma-separated, newline-terminated, nothing skipped.
    pub fn new(types: Vec<ColumnType>) -> Self {
        Self {
            types,
            delimiter: default_delimiter(),
            record_delimiter: default_record_delimiter(),
            skip_records: 0,
            malformed: MalformedPolicy::default(),
            trailing: TrailingRecord::default(),
            initial_rows: None,
            int_sentinel: 0,
            float_sentinel: 0.0,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn record_delimiter(mut self, record_delimiter: u8) -> Self {
        self.record_delimiter = record_delimiter;
        self
    }

    pub fn skip_records(mut self, skip_records: u64) -> Self {
        self.skip_records = skip_records;
        self
    }

    pub fn malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    pub fn trailing(mut self, trailing: TrailingRecord) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn initial_rows(mut self, rows: usize) -> Self {
        self.initial_rows = Some(rows);
        self
    }

    pub fn sentinels(mut self, int_sentinel: i64, float_sentinel: f64) -> Self {
        self.int_sentinel = int_sentinel;
        self.float_sentinel = float_sentinel;
        self
    }

    /// Number of declared columns.
    pub fn num_columns(&self) -> usize {
        self.types.len()
    }

    /// Reject caller contract violations before any allocation happens.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(TipError::Config("at least one column is required".into()));
        }
        if self.delimiter == self.record_delimiter {
            return Err(TipError::Config(format!(
                "field and record delimiters must differ (both {:?})",
                self.delimiter as char
            )));
        }
        Ok(())
    }

    /// Load options from a JSON file and validate them.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }
}

/// Serialize a delimiter byte as a one-character string.
///
/// Bytes map to the code points U+0000..=U+00FF, so delimiters at or above
/// 0x80 survive a round trip.
mod byte_char {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(char::from(*byte).encode_utf8(&mut [0; 4]))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => u8::try_from(c).map_err(|_| {
                D::Error::custom(format!("delimiter must be a single byte, got {:?}", s))
            }),
            _ => Err(D::Error::custom(format!(
                "delimiter must be a single byte, got {:?}",
                s
            ))),
        }
    }
}

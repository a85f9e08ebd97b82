//! Typed columnar storage.
//!
//! A `ColumnSet` owns one `Column` per declared `ColumnType`. Columns are
//! allocated together, grow together and are released together; no API
//! hands out or frees a single column on its own.

pub mod growth;
pub mod numeric;
pub mod string;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_STRING_BYTES;
use crate::error::{Result, TipError};

pub use numeric::{FloatColumn, IntColumn, PrimitiveColumn};
pub use string::StringColumn;

// ── Column Type ────────────────────────────────────────────────────

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ColumnType {
    #[serde(alias = "int")]
    Integer = 0,
    Float = 1,
    #[serde(alias = "str")]
    String = 2,
}

impl ColumnType {
    /// Map a numeric type tag (0 = integer, 1 = float, 2 = string).
    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            0 => Ok(Self::Integer),
            1 => Ok(Self::Float),
            2 => Ok(Self::String),
            other => Err(TipError::Config(format!("unknown column type tag {}", other))),
        }
    }

    /// Map a slice of numeric tags, rejecting the first unknown one.
    pub fn from_tags(tags: &[i32]) -> Result<Vec<Self>> {
        tags.iter().map(|&t| Self::from_tag(t)).collect()
    }

    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Parse a comma-separated list such as `"int,float,str"`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',').map(|s| s.trim().parse()).collect()
    }
}

impl FromStr for ColumnType {
    type Err = TipError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" | "int" | "integer" => Ok(Self::Integer),
            "f" | "float" | "double" => Ok(Self::Float),
            "s" | "str" | "string" => Ok(Self::String),
            other => Err(TipError::Config(format!("unknown column type {:?}", other))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        })
    }
}

// ── Field Value ────────────────────────────────────────────────────

/// A converted field on its way into a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Integer(i64),
    Float(f64),
    String(&'a [u8]),
}

// ── Column ─────────────────────────────────────────────────────────

/// One typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Integer(IntColumn),
    Float(FloatColumn),
    String(StringColumn),
}

impl Column {
    /// Allocate an empty column of `column_type` with room for `rows` rows.
    ///
    /// String columns also reserve `string_bytes` bytes of text; numeric
    /// columns ignore it.
    pub fn with_capacity(column_type: ColumnType, rows: usize, string_bytes: usize) -> Result<Self> {
        Ok(match column_type {
            ColumnType::Integer => Column::Integer(IntColumn::with_capacity(rows)?),
            ColumnType::Float => Column::Float(FloatColumn::with_capacity(rows)?),
            ColumnType::String => Column::String(StringColumn::with_capacity(rows, string_bytes)?),
        })
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Integer(_) => ColumnType::Integer,
            Column::Float(_) => ColumnType::Float,
            Column::String(_) => ColumnType::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Integer(c) => c.len(),
            Column::Float(c) => c.len(),
            Column::String(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity_rows(&self) -> usize {
        match self {
            Column::Integer(c) => c.capacity_rows(),
            Column::Float(c) => c.capacity_rows(),
            Column::String(c) => c.capacity_rows(),
        }
    }

    /// Ensure room for `additional` more rows.
    pub fn grow(&mut self, additional: usize) -> Result<bool> {
        match self {
            Column::Integer(c) => c.grow(additional),
            Column::Float(c) => c.grow(additional),
            Column::String(c) => c.grow(additional),
        }
    }

    /// Append a value whose variant must match the column type.
    pub fn push(&mut self, value: FieldValue<'_>) -> Result<bool> {
        match (self, value) {
            (Column::Integer(c), FieldValue::Integer(v)) => c.push(v),
            (Column::Float(c), FieldValue::Float(v)) => c.push(v),
            (Column::String(c), FieldValue::String(v)) => c.append(v),
            (column, value) => Err(TipError::Config(format!(
                "cannot store {:?} in a {} column",
                value,
                column.column_type()
            ))),
        }
    }

    pub fn as_int(&self) -> Option<&IntColumn> {
        match self {
            Column::Integer(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&FloatColumn> {
        match self {
            Column::Float(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(c) => Some(c),
            _ => None,
        }
    }
}

// ── ColumnSet ──────────────────────────────────────────────────────

/// The full set of columns produced by one parse.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<Column>,
    /// Row-capacity reallocations: each `grow` that moved at least one
    /// column, plus each `push` that had to grow its own column.
    row_growths: u32,
}

impl PartialEq for ColumnSet {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl ColumnSet {
    /// Allocate one column per type, each with room for `initial_rows` rows.
    /// String columns get `initial_rows * DEFAULT_STRING_BYTES` bytes.
    pub fn with_capacity(types: &[ColumnType], initial_rows: usize) -> Result<Self> {
        Self::with_capacities(
            types,
            initial_rows,
            initial_rows.saturating_mul(DEFAULT_STRING_BYTES),
        )
    }

    /// Like `with_capacity`, with an explicit byte reservation per string
    /// column.
    ///
    /// If any allocation fails, the columns allocated so far are dropped
    /// before the error is returned.
    pub fn with_capacities(
        types: &[ColumnType],
        initial_rows: usize,
        string_bytes: usize,
    ) -> Result<Self> {
        if types.is_empty() {
            return Err(TipError::Config("at least one column is required".into()));
        }
        let mut columns = Vec::new();
        columns
            .try_reserve_exact(types.len())
            .map_err(|e| TipError::allocation(types.len(), "columns", e))?;
        for &column_type in types {
            columns.push(Column::with_capacity(column_type, initial_rows, string_bytes)?);
        }
        tracing::trace!(
            columns = types.len(),
            initial_rows,
            string_bytes,
            "Allocated column set"
        );
        Ok(Self {
            columns,
            row_growths: 0,
        })
    }

    /// Ensure every column has room for `additional` more rows.
    ///
    /// Growth is geometric per column; string byte buffers are grown
    /// separately as strings are appended.
    pub fn grow(&mut self, additional: usize) -> Result<()> {
        let mut grew = false;
        for column in &mut self.columns {
            grew |= column.grow(additional)?;
        }
        if grew {
            self.row_growths += 1;
            tracing::trace!(
                rows = self.len(),
                capacity = self.capacity_rows(),
                "Grew column set"
            );
        }
        Ok(())
    }

    /// Make sure one more full row fits in every column.
    pub fn reserve_row(&mut self) -> Result<()> {
        if self.columns.iter().any(|c| c.len() >= c.capacity_rows()) {
            self.grow(1)?;
        }
        Ok(())
    }

    /// Append `value` to column `col`.
    pub fn push(&mut self, col: usize, value: FieldValue<'_>) -> Result<()> {
        let num_columns = self.columns.len();
        let column = self.columns.get_mut(col).ok_or_else(|| {
            TipError::Config(format!("column {} out of range ({} columns)", col, num_columns))
        })?;
        if column.push(value)? {
            self.row_growths += 1;
        }
        Ok(())
    }

    /// Release every column at once.
    pub fn free(self) {
        drop(self);
    }

    /// Number of complete rows.
    pub fn len(&self) -> usize {
        self.columns.iter().map(Column::len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Smallest row capacity across columns.
    pub fn capacity_rows(&self) -> usize {
        self.columns
            .iter()
            .map(Column::capacity_rows)
            .min()
            .unwrap_or(0)
    }

    pub fn types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(Column::column_type).collect()
    }

    pub fn column_type(&self, col: usize) -> Option<ColumnType> {
        self.columns.get(col).map(Column::column_type)
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Number of row-capacity reallocations so far.
    pub fn row_growths(&self) -> u32 {
        self.row_growths
    }

    /// Number of string byte-buffer reallocations so far.
    pub fn byte_growths(&self) -> u32 {
        self.columns
            .iter()
            .filter_map(Column::as_string)
            .map(StringColumn::byte_growths)
            .sum()
    }

    // ── Cell Accessors ─────────────────────────────────────────────

    /// Integer at (`col`, `row`). `None` if out of range or not an integer column.
    pub fn get_int(&self, col: usize, row: usize) -> Option<i64> {
        self.columns.get(col)?.as_int()?.get(row)
    }

    /// Float at (`col`, `row`).
    pub fn get_float(&self, col: usize, row: usize) -> Option<f64> {
        self.columns.get(col)?.as_float()?.get(row)
    }

    /// Raw string bytes at (`col`, `row`).
    pub fn get_bytes(&self, col: usize, row: usize) -> Option<&[u8]> {
        self.columns.get(col)?.as_string()?.get_bytes(row)
    }

    /// String at (`col`, `row`), if valid UTF-8.
    pub fn get_str(&self, col: usize, row: usize) -> Option<&str> {
        self.columns.get(col)?.as_string()?.get_str(row)
    }
}

//! Fixed-width numeric columns.

use crate::columns::growth::{grow_for, reserve_total};
use crate::error::Result;

/// Growable array of fixed-width values, one per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimitiveColumn<T> {
    values: Vec<T>,
}

/// Signed 64-bit integer column.
pub type IntColumn = PrimitiveColumn<i64>;

/// Double-precision float column.
pub type FloatColumn = PrimitiveColumn<f64>;

impl<T: Copy> PrimitiveColumn<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Allocate room for `rows` values up front.
    pub fn with_capacity(rows: usize) -> Result<Self> {
        let mut values = Vec::new();
        reserve_total(&mut values, rows, "rows")?;
        Ok(Self { values })
    }

    /// Append a value, growing first if the column is full.
    ///
    /// Returns `true` if the column was reallocated.
    pub fn push(&mut self, value: T) -> Result<bool> {
        let grew = if self.values.len() == self.values.capacity() {
            grow_for(&mut self.values, 1, "rows")?
        } else {
            false
        };
        self.values.push(value);
        Ok(grew)
    }

    /// Ensure room for `additional` more rows.
    pub fn grow(&mut self, additional: usize) -> Result<bool> {
        grow_for(&mut self.values, additional, "rows")
    }

    /// Value at `row`, if populated.
    #[inline]
    pub fn get(&self, row: usize) -> Option<T> {
        self.values.get(row).copied()
    }

    /// All populated values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity_rows(&self) -> usize {
        self.values.capacity()
    }

    /// Consume the column, returning its values.
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

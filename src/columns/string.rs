//! Flat-buffer string column.
//!
//! All strings of a column live in one contiguous byte buffer. A parallel
//! offset array stores, for every row, the cumulative end position of that
//! row's bytes, so row `i` spans `data[offsets[i-1]..offsets[i]]` with an
//! implicit `offsets[-1] = 0`:
//!
//! ```text
//! rows:     "abc"   ""    "de"
//! offsets:  [3,     3,    5]
//! data:     a b c d e
//! ```
//!
//! The byte buffer and the offset array grow independently of each other.
//! Bytes are copied verbatim; no UTF-8 validation happens on append.

use crate::columns::growth::{grow_for, reserve_total};
use crate::error::Result;

/// String column stored as a flat byte buffer plus end offsets.
#[derive(Debug, Clone, Default)]
pub struct StringColumn {
    /// End offset (exclusive) of each row's bytes in `data`. Non-decreasing.
    offsets: Vec<u64>,
    /// Concatenated row bytes.
    data: Vec<u8>,
    /// Number of times `data` was reallocated.
    byte_growths: u32,
}

/// Columns are equal when they hold the same rows, however they grew.
impl PartialEq for StringColumn {
    fn eq(&self, other: &Self) -> bool {
        self.offsets == other.offsets && self.data == other.data
    }
}

impl StringColumn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate room for `rows` strings totalling `bytes` bytes.
    pub fn with_capacity(rows: usize, bytes: usize) -> Result<Self> {
        let mut offsets = Vec::new();
        reserve_total(&mut offsets, rows, "rows")?;
        let mut data = Vec::new();
        reserve_total(&mut data, bytes, "bytes")?;
        Ok(Self {
            offsets,
            data,
            byte_growths: 0,
        })
    }

    /// Append one string.
    ///
    /// Grows the byte buffer if the string does not fit, copies it in, then
    /// grows the offset array if every row slot is taken and records the new
    /// end offset. Empty strings are valid and repeat the previous offset.
    ///
    /// Returns `true` if the offset array was reallocated.
    pub fn append(&mut self, bytes: &[u8]) -> Result<bool> {
        self.reserve_bytes(bytes.len())?;
        self.data.extend_from_slice(bytes);

        let grew = if self.offsets.len() == self.offsets.capacity() {
            grow_for(&mut self.offsets, 1, "rows")?
        } else {
            false
        };
        self.offsets.push(self.data.len() as u64);
        Ok(grew)
    }

    /// Ensure room for `additional` more rows in the offset array.
    pub fn grow(&mut self, additional: usize) -> Result<bool> {
        grow_for(&mut self.offsets, additional, "rows")
    }

    /// Ensure room for `additional` more bytes in the data buffer.
    pub fn reserve_bytes(&mut self, additional: usize) -> Result<bool> {
        if self.data.len().saturating_add(additional) <= self.data.capacity() {
            return Ok(false);
        }
        let grew = grow_for(&mut self.data, additional, "bytes")?;
        if grew {
            self.byte_growths += 1;
        }
        Ok(grew)
    }

    /// Byte range of `row` within `data`.
    #[inline]
    pub fn range(&self, row: usize) -> Option<(usize, usize)> {
        let end = *self.offsets.get(row)? as usize;
        let start = match row {
            0 => 0,
            _ => self.offsets[row - 1] as usize,
        };
        Some((start, end))
    }

    /// Raw bytes of `row`.
    #[inline]
    pub fn get_bytes(&self, row: usize) -> Option<&[u8]> {
        let (start, end) = self.range(row)?;
        Some(&self.data[start..end])
    }

    /// `row` as text. `None` if the row is missing or not valid UTF-8.
    pub fn get_str(&self, row: usize) -> Option<&str> {
        std::str::from_utf8(self.get_bytes(row)?).ok()
    }

    /// Iterator over the raw bytes of every row.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let mut start = 0usize;
        self.offsets.iter().map(move |&end| {
            let end = end as usize;
            let bytes = &self.data[start..end];
            start = end;
            bytes
        })
    }

    /// End offsets, one per row.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// The flat byte buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Bytes used in the data buffer.
    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn capacity_rows(&self) -> usize {
        self.offsets.capacity()
    }

    pub fn capacity_bytes(&self) -> usize {
        self.data.capacity()
    }

    /// Number of times the byte buffer was reallocated.
    pub fn byte_growths(&self) -> u32 {
        self.byte_growths
    }

    /// Consume the column, returning `(offsets, data)`.
    pub fn into_parts(self) -> (Vec<u64>, Vec<u8>) {
        (self.offsets, self.data)
    }
}

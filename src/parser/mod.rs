//! Single-pass tokenizer.
//!
//! Walks a byte span once, front to back. Records end at the record
//! delimiter, fields end at the field delimiter or the record delimiter.
//! Each field is converted according to its column's declared type and
//! appended straight into the `ColumnSet`; no row objects are built.
//!
//! Scan order:
//! 1. Skip phase: the first `skip_records` records are located with a
//!    single-byte search for the record delimiter and never converted.
//! 2. Materialize phase: the remaining records are split with a two-byte
//!    search (`memchr2`) and stored field by field.
//!
//! Under `TrailingRecord::Drop` the materialize phase stops at the last
//! record delimiter, so an unterminated tail is never partially stored.

pub mod convert;

use std::time::Instant;

use memchr::{memchr, memchr2, memchr_iter, memrchr};

use crate::columns::{ColumnSet, ColumnType, FieldValue};
use crate::config::{
    MalformedPolicy, ParseOptions, TrailingRecord, DEFAULT_INITIAL_ROWS, DEFAULT_STRING_BYTES,
    ESTIMATE_SAMPLE_BYTES, MAX_INITIAL_ROWS, MIN_CAPACITY,
};
use crate::error::{Result, TipError};
use crate::stats::{ParseStats, TrailingPartial};

// ── Parse Result ───────────────────────────────────────────────────

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// Records stored in `columns` (skipped records excluded).
    pub record_count: u64,
    pub columns: ColumnSet,
    pub stats: ParseStats,
}

impl Parsed {
    pub fn into_parts(self) -> (u64, ColumnSet) {
        (self.record_count, self.columns)
    }
}

// ── Entry Points ───────────────────────────────────────────────────

/// Parse `span` into columns of the given `types`.
///
/// Uses the default policies: malformed numeric fields and field-count
/// mismatches are coerced to sentinels, an unterminated last record is
/// parsed.
pub fn parse(
    span: &[u8],
    types: &[ColumnType],
    delim: u8,
    eordelim: u8,
    skiprecs: u64,
) -> Result<Parsed> {
    let options = ParseOptions::new(types.to_vec())
        .delimiter(delim)
        .record_delimiter(eordelim)
        .skip_records(skiprecs);
    parse_with(span, &options)
}

/// Parse `span` with full control over options.
pub fn parse_with(span: &[u8], options: &ParseOptions) -> Result<Parsed> {
    options.validate()?;
    let started = Instant::now();

    let initial_rows = options.initial_rows.unwrap_or_else(|| {
        estimate_rows(span, options.record_delimiter, options.skip_records)
    });
    tracing::debug!(
        bytes = span.len(),
        columns = options.num_columns(),
        skip = options.skip_records,
        initial_rows,
        "Parse started"
    );

    // A single column never holds more string bytes than the span itself.
    let string_bytes = initial_rows
        .saturating_mul(DEFAULT_STRING_BYTES)
        .min(span.len());
    let columns = ColumnSet::with_capacities(&options.types, initial_rows, string_bytes)?;
    let mut tokenizer = Tokenizer::new(span, options, columns);
    tokenizer.stats.initial_rows = initial_rows;
    tokenizer.run()?;

    let Tokenizer {
        columns, mut stats, ..
    } = tokenizer;
    stats.row_growths = columns.row_growths();
    stats.byte_growths = columns.byte_growths();
    stats.elapsed_us = started.elapsed().as_micros() as u64;

    if stats.has_coercions() {
        tracing::warn!(
            malformed_fields = stats.malformed_fields,
            short_records = stats.short_records,
            long_records = stats.long_records,
            "Coerced malformed input to sentinels"
        );
    }
    tracing::debug!(
        records = stats.records_materialized,
        skipped = stats.records_skipped,
        row_growths = stats.row_growths,
        byte_growths = stats.byte_growths,
        elapsed_us = stats.elapsed_us,
        "Parse finished"
    );

    Ok(Parsed {
        record_count: stats.records_materialized,
        columns,
        stats,
    })
}

/// Estimate how many records will be materialized from `span`.
///
/// Counts record delimiters in the first `ESTIMATE_SAMPLE_BYTES` and
/// extrapolates to the full length. The result never exceeds what the span
/// could possibly hold and is clamped to `[MIN_CAPACITY, MAX_INITIAL_ROWS]`.
pub fn estimate_rows(span: &[u8], record_delimiter: u8, skip_records: u64) -> usize {
    if span.is_empty() {
        return MIN_CAPACITY;
    }
    let sample = &span[..span.len().min(ESTIMATE_SAMPLE_BYTES)];
    let in_sample = memchr_iter(record_delimiter, sample).count();

    let estimate = if in_sample == 0 {
        DEFAULT_INITIAL_ROWS
    } else if sample.len() == span.len() {
        in_sample + 1
    } else {
        (span.len() as u128 * in_sample as u128 / sample.len() as u128) as usize + 1
    };
    let skip = usize::try_from(skip_records).unwrap_or(usize::MAX);
    estimate
        .min(span.len() + 1)
        .saturating_sub(skip)
        .clamp(MIN_CAPACITY, MAX_INITIAL_ROWS)
}

// ── Tokenizer ──────────────────────────────────────────────────────

struct Tokenizer<'a> {
    span: &'a [u8],
    options: &'a ParseOptions,
    columns: ColumnSet,
    stats: ParseStats,
    /// Next unread byte.
    pos: usize,
    /// Zero-based index of the current record, counting skipped ones.
    record: u64,
}

impl<'a> Tokenizer<'a> {
    fn new(span: &'a [u8], options: &'a ParseOptions, columns: ColumnSet) -> Self {
        Self {
            span,
            options,
            columns,
            stats: ParseStats::default(),
            pos: 0,
            record: 0,
        }
    }

    fn run(&mut self) -> Result<()> {
        self.skip_leading();

        let end = match self.options.trailing {
            TrailingRecord::Parse => self.span.len(),
            TrailingRecord::Drop => {
                let rest = &self.span[self.pos..];
                let end = memrchr(self.options.record_delimiter, rest)
                    .map_or(self.pos, |i| self.pos + i + 1);
                if end < self.span.len() {
                    self.stats.trailing_partial = TrailingPartial::Dropped;
                }
                end
            }
        };

        while self.pos < end {
            self.parse_record(end)?;
        }

        self.stats.bytes_scanned = end as u64;
        Ok(())
    }

    /// Step over the leading `skip_records` records without converting them.
    fn skip_leading(&mut self) {
        let span = self.span;
        while self.record < self.options.skip_records && self.pos < span.len() {
            match memchr(self.options.record_delimiter, &span[self.pos..]) {
                Some(i) => {
                    self.pos += i + 1;
                }
                None => {
                    // A dropped tail stays unread; `run` stops before it.
                    if self.options.trailing == TrailingRecord::Drop {
                        return;
                    }
                    self.pos = span.len();
                    self.stats.trailing_partial = TrailingPartial::Skipped;
                }
            }
            self.record += 1;
            self.stats.records_skipped += 1;
        }
    }

    /// Parse one record starting at `pos`, stopping no later than `end`.
    fn parse_record(&mut self, end: usize) -> Result<()> {
        let span = self.span;
        let delim = self.options.delimiter;
        let eor = self.options.record_delimiter;

        self.columns.reserve_row()?;

        let mut fields = 0usize;
        loop {
            let rest = &span[self.pos..end];
            match memchr2(delim, eor, rest) {
                Some(i) => {
                    let terminator = rest[i];
                    self.pos += i + 1;
                    self.store_field(fields, &rest[..i])?;
                    fields += 1;
                    if terminator == eor {
                        break;
                    }
                }
                None => {
                    // Unterminated tail; only reachable with TrailingRecord::Parse.
                    self.pos = end;
                    self.store_field(fields, rest)?;
                    fields += 1;
                    self.stats.trailing_partial = TrailingPartial::Parsed;
                    break;
                }
            }
        }

        self.finish_record(fields)?;
        self.record += 1;
        self.stats.records_materialized += 1;
        Ok(())
    }

    /// Convert and store field number `index` of the current record.
    /// Fields past the last column are counted by the caller and dropped.
    fn store_field(&mut self, index: usize, field: &[u8]) -> Result<()> {
        let column_type = match self.columns.column_type(index) {
            Some(t) => t,
            None => return Ok(()),
        };
        let value = match column_type {
            ColumnType::Integer => FieldValue::Integer(self.int_field(index, field)?),
            ColumnType::Float => FieldValue::Float(self.float_field(index, field)?),
            ColumnType::String => FieldValue::String(field),
        };
        self.columns.push(index, value)
    }

    fn int_field(&mut self, column: usize, field: &[u8]) -> Result<i64> {
        if field.is_empty() {
            self.stats.empty_numeric_fields += 1;
            return Ok(self.options.int_sentinel);
        }
        match convert::parse_int(field) {
            Some(v) => Ok(v),
            None => {
                self.malformed(column, ColumnType::Integer, field)?;
                Ok(self.options.int_sentinel)
            }
        }
    }

    fn float_field(&mut self, column: usize, field: &[u8]) -> Result<f64> {
        if field.is_empty() {
            self.stats.empty_numeric_fields += 1;
            return Ok(self.options.float_sentinel);
        }
        match convert::parse_float(field) {
            Some(v) => Ok(v),
            None => {
                self.malformed(column, ColumnType::Float, field)?;
                Ok(self.options.float_sentinel)
            }
        }
    }

    /// Apply the malformed-field policy. Returns `Ok` if the caller should
    /// store the sentinel.
    fn malformed(&mut self, column: usize, column_type: ColumnType, field: &[u8]) -> Result<()> {
        match self.options.malformed {
            MalformedPolicy::Sentinel => {
                self.stats.malformed_fields += 1;
                Ok(())
            }
            MalformedPolicy::Abort => Err(TipError::MalformedField {
                record: self.record,
                column,
                column_type,
                text: String::from_utf8_lossy(field).into_owned(),
            }),
        }
    }

    /// Check the field count of the record just read and pad if needed.
    fn finish_record(&mut self, fields: usize) -> Result<()> {
        let expected = self.columns.num_columns();
        if fields == expected {
            return Ok(());
        }
        if self.options.malformed == MalformedPolicy::Abort {
            return Err(TipError::FieldCount {
                record: self.record,
                expected,
                found: fields,
            });
        }
        if fields > expected {
            self.stats.long_records += 1;
            return Ok(());
        }

        self.stats.short_records += 1;
        for col in fields..expected {
            let value = match self.columns.column_type(col) {
                Some(ColumnType::Integer) => FieldValue::Integer(self.options.int_sentinel),
                Some(ColumnType::Float) => FieldValue::Float(self.options.float_sentinel),
                Some(ColumnType::String) | None => FieldValue::String(&[]),
            };
            self.columns.push(col, value)?;
        }
        Ok(())
    }
}

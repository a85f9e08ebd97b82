//! Per-parse counters.
//!
//! Collected by the tokenizer as it runs and returned alongside the
//! columns. Cheap to maintain (plain integer increments) and serializable
//! so the CLI can print them as JSON.

use serde::Serialize;

/// What happened to bytes after the last record delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingPartial {
    /// Input ended with a record delimiter (or was empty).
    #[default]
    None,
    /// The tail was materialized as a final record.
    Parsed,
    /// The tail was ignored.
    Dropped,
    /// The tail fell inside the skipped leading records.
    Skipped,
}

/// Counters for a single parse call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseStats {
    /// Bytes of input consumed. A dropped trailing partial record is not
    /// included.
    pub bytes_scanned: u64,
    /// Leading records discarded without materializing.
    pub records_skipped: u64,
    /// Records stored in the columns.
    pub records_materialized: u64,
    pub trailing_partial: TrailingPartial,
    /// Empty integer/float fields that received the sentinel.
    pub empty_numeric_fields: u64,
    /// Non-empty numeric fields that failed to parse and received the sentinel.
    pub malformed_fields: u64,
    /// Records with fewer fields than columns (padded).
    pub short_records: u64,
    /// Records with more fields than columns (extra fields ignored).
    pub long_records: u64,
    /// Row-capacity reallocations, whether from growing the whole set or a
    /// single column.
    pub row_growths: u32,
    /// String byte-buffer reallocations.
    pub byte_growths: u32,
    /// Row capacity the columns started with.
    pub initial_rows: usize,
    /// Wall-clock parse time in microseconds.
    pub elapsed_us: u64,
}

impl ParseStats {
    /// Whether any field or record was coerced under the sentinel policy.
    pub fn has_coercions(&self) -> bool {
        self.malformed_fields > 0 || self.short_records > 0 || self.long_records > 0
    }

    /// Throughput in MB/s, or 0 when the parse was too fast to time.
    pub fn throughput_mb_s(&self) -> f64 {
        if self.elapsed_us == 0 {
            return 0.0;
        }
        (self.bytes_scanned as f64 / (1024.0 * 1024.0)) / (self.elapsed_us as f64 / 1_000_000.0)
    }
}

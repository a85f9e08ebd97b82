//! Error types for the ingestion engine

use std::collections::TryReserveError;

use thiserror::Error;

use crate::columns::ColumnType;

pub type Result<T> = std::result::Result<T, TipError>;

#[derive(Error, Debug)]
pub enum TipError {
    #[error("Allocation failed while reserving {requested} more {unit}: {source}")]
    Allocation {
        requested: usize,
        unit: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed {column_type} field in record {record}, column {column}: {text:?}")]
    MalformedField {
        record: u64,
        column: usize,
        column_type: ColumnType,
        text: String,
    },

    #[error("Record {record} has {found} fields, expected {expected}")]
    FieldCount {
        record: u64,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TipError {
    /// Wrap a failed reservation of `requested` elements.
    pub(crate) fn allocation(requested: usize, unit: &'static str, source: TryReserveError) -> Self {
        TipError::Allocation {
            requested,
            unit,
            source,
        }
    }

    /// Stable error code for callers and the CLI
    pub fn code(&self) -> &'static str {
        match self {
            TipError::Allocation { .. } => "ALLOCATION_ERROR",
            TipError::Io(_) => "IO_ERROR",
            TipError::Json(_) => "OPTIONS_ERROR",
            TipError::MalformedField { .. } => "MALFORMED_FIELD",
            TipError::FieldCount { .. } => "FIELD_COUNT_MISMATCH",
            TipError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether this error was caused by the input data rather than the
    /// environment or the caller.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            TipError::MalformedField { .. } | TipError::FieldCount { .. }
        )
    }
}

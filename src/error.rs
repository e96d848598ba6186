//! Error types for the gsheets library

use thiserror::Error;

/// Result type alias for gsheets operations
pub type Result<T> = std::result::Result<T, SheetError>;

/// Main error type for all sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    /// The grid has no header row to key records against
    #[error("Grid is empty: no header row to key records against")]
    EmptyGrid,

    /// A header cell used as a record key is not text
    #[error("Header cell in column {column} is not text (found {found})")]
    MalformedHeader { column: usize, found: &'static str },

    /// A shaped record could not be decoded into the requested type
    #[error("Failed to decode data row {row}: {message}")]
    Decode { row: usize, message: String },

    /// A document field could not be decoded as a serial date
    #[error("Failed to decode serial date: {0}")]
    DocumentDecode(String),

    /// Serial date outside the representable calendar range
    #[error("Serial date {0} is outside the representable date range")]
    SerialDateOutOfRange(f64),

    /// Range not known to the value source
    #[error("Range '{range}' not found. Available ranges: {available}")]
    RangeNotFound { range: String, available: String },

    /// Missing or unusable service account credentials
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// Incomplete client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The Sheets API answered with a non-success status
    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error wrapper
    #[cfg(feature = "sheets-api")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

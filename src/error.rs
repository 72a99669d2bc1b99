//! Error types for the label sheet library

use thiserror::Error;

/// Result type alias using SheetError
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur when laying out, rendering or persisting label sheets
#[derive(Debug, Error)]
pub enum SheetError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// The QR payload could not be encoded
    #[error("QR code encoding failed: {0}")]
    QrError(#[from] qrcode::types::QrError),

    /// An import file did not match the interchange schema. The whole import is rejected.
    #[error("Import rejected: {0}")]
    Import(#[from] serde_json::Error),

    /// The current state could not be serialized
    #[error("Export failed: {0}")]
    Export(String),

    /// A sheet configuration field is out of range
    #[error("Invalid sheet configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A record index outside the current record list
    #[error("Record index {index} out of range for {len} records")]
    RecordIndex { index: usize, len: usize },

    /// The key-value store could not be read or written
    #[error("Storage failed: {0}")]
    Storage(String),

    /// Text rendering error
    #[error("Text rendering failed: {0}")]
    TextError(String),

    /// Unknown preset name
    #[error("Unknown sheet preset '{0}'")]
    UnknownPreset(String),

    /// Page not found
    #[error("Page with ID {0:?} not found")]
    PageNotFound(lopdf::ObjectId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

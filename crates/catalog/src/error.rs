//! Error types for the catalog crate.
//!
//! Only failures that make a whole snapshot unusable live here. Records that
//! are merely incomplete (an order line without a product, a review whose
//! author no longer exists) are skipped during resolution instead.

use thiserror::Error;

/// Errors that can occur while loading or resolving catalog documents
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Snapshot file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a snapshot file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A JSON-Lines record couldn't be decoded
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A document lacks a field that every downstream computation depends on
    ///
    /// `position` is the zero-based index of the document in its collection,
    /// since there is no id to report.
    #[error("{entity} document at position {position} is missing required field `{field}`")]
    MissingField {
        entity: String,
        field: String,
        position: usize,
    },

    /// Two documents in one collection share an id
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: String, id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;

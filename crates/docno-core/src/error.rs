//! Error types for the docno-core library.

use thiserror::Error;

/// Main error type for the docno library.
#[derive(Error, Debug)]
pub enum DocnoError {
    /// Template catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the template catalog.
///
/// A single invalid template pattern is NOT an error: the matcher skips it
/// with a warning and continues with the rest of the catalog. These variants
/// cover problems with the catalog as a whole.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to parse a catalog file.
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    /// The catalog has no usable templates.
    #[error("catalog has no enabled templates with valid patterns")]
    Empty,
}

/// Result type for the docno library.
pub type Result<T> = std::result::Result<T, DocnoError>;

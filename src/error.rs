//! Error types for the pdftoc library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document cannot be opened or its structure cannot be parsed.
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Body-font estimation failed because no sampled page could be read.
    #[error("Font estimation failed: {0}")]
    Estimation(String),

    /// A configuration value could not be applied.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error serializing results to JSON.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A result could not be persisted; fatal to the whole batch.
    #[error("Output write failed: {0}")]
    OutputWrite(String),

    /// Batch setup error (e.g. worker pool construction).
    #[error("Batch error: {0}")]
    Batch(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Unreadable(err.to_string()),
        }
    }
}

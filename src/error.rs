//! Error types for plume operations.

use thiserror::Error;

/// Errors that can occur during project reading, conversion, or writeback.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File is write protected: {0}")]
    WriteProtected(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Malformed document structure: {0}")]
    MalformedStructure(String),

    #[error("Structure mismatch at position {position}: expected {expected}, found {found}")]
    StructureMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Unknown identifier: {kind} {id} does not exist in the project")]
    UnknownIdentifier { kind: &'static str, id: String },

    #[error("Project is locked: {0}")]
    ResourceLocked(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

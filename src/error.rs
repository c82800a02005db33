//! Error types for docsift.

use std::io;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting outlines or ranking sections.
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

    /// Malformed or unreadable PDF structure.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document produced no text runs at all.
    #[error("PDF parsing error: document contains no text runs")]
    EmptyRuns,

    /// No body-text baseline could be determined.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Ranking was requested over zero sections.
    #[error("Empty corpus: no sections available for ranking")]
    EmptyCorpus,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error while serializing output payloads.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid caller input (request files, options).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether a later stage can tolerate this failure by emitting a
    /// degraded result (title-only, empty outline) for the document.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Error::EmptyRuns | Error::Classification(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::InvalidInput(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyCorpus;
        assert_eq!(
            err.to_string(),
            "Empty corpus: no sections available for ranking"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_degradable_errors() {
        assert!(Error::EmptyRuns.is_degradable());
        assert!(Error::Classification("no runs".into()).is_degradable());
        assert!(!Error::Parse("bad xref".into()).is_degradable());
        assert!(!Error::EmptyCorpus.is_degradable());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

//! Error types for the oxmltext library.

use std::io;
use thiserror::Error;

/// Result type alias for oxmltext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting text from a package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the container or one of its parts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The container could not be opened or enumerated.
    #[error("ZIP archive error: {0}")]
    Archive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// An optional part is absent from the package.
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// A relationship id or its target could not be resolved.
    #[error("Relationship {id} could not be resolved: {reason}")]
    RelationshipResolution {
        /// The relationship id being looked up.
        id: String,
        /// What went missing.
        reason: String,
    },

    /// An expected attribute is missing or empty.
    #[error("Malformed reference: missing {0} attribute")]
    MalformedReference(&'static str),

    /// The OCR capability failed on an image.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// An embedded image could not be decoded.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Invalid configuration data.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The requested slide does not exist.
    #[error("Slide {0} not found")]
    SlideNotFound(usize),

    /// The requested sheet does not exist.
    #[error("Sheet {0} not found")]
    SheetNotFound(usize),

    /// The parser has already been closed.
    #[error("Parser is closed")]
    Closed,
}

impl Error {
    /// Whether the error only costs the contribution of one section or reference.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PartNotFound(_)
                | Error::RelationshipResolution { .. }
                | Error::MalformedReference(_)
                | Error::Ocr(_)
        )
    }

    pub(crate) fn unresolved(id: &str, reason: impl Into<String>) -> Self {
        Error::RelationshipResolution {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

/// A fatal extraction failure together with the text assembled before it.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct ExtractError {
    /// Text extracted up to the failure.
    pub partial: String,
    /// The underlying failure.
    #[source]
    pub source: Error,
}

impl ExtractError {
    pub(crate) fn new(partial: String, source: Error) -> Self {
        Self { partial, source }
    }
}

impl From<Error> for ExtractError {
    fn from(source: Error) -> Self {
        Self {
            partial: String::new(),
            source,
        }
    }
}

/// Result of a text extraction call.
pub type ExtractResult = std::result::Result<String, ExtractError>;

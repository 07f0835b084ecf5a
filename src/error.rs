//! Error types for docxtmpl library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docxtmpl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while preparing or rendering a template.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The template file does not exist.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The container is not a readable zip archive.
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// The requested part is missing from the archive.
    #[error("Part not found in archive: {0}")]
    PartNotFound(String),

    /// The document part is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The markup is not well-formed.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// A paragraph ends while a placeholder is still open.
    #[error("Unbalanced placeholder in paragraph {paragraph}: {text:?}")]
    UnbalancedPlaceholder {
        /// Zero-based paragraph index in document order
        paragraph: usize,
        /// Text of the runs that could not be merged
        text: String,
    },

    /// The template engine rejected the template or the data.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The replacement data could not be decoded.
    #[error("Invalid replacement data: {0}")]
    Data(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means a file or archive part does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::TemplateNotFound(_) | Error::PartNotFound(_) => true,
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::PartNotFound("<unknown>".into()),
            other => Error::MalformedContainer(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Data(err.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

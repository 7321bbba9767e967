//! Error types for IDML extraction and merging.

use thiserror::Error;

/// Errors that can occur while reading or writing an IDML package.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    Escape(String),

    #[error("UTF-8 decoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Invalid IDML package: {0}")]
    InvalidPackage(String),

    #[error("Unexpected structure: {0}")]
    UnexpectedStructure(String),

    #[error("Missing required attribute {attribute} on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Attribute {name} is {size} bytes, exceeding the limit of {limit}")]
    AttributeTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("Invalid transformation matrix: {0}")]
    InvalidTransform(String),

    #[error("Unexpected code: {0}")]
    UnexpectedCode(u32),

    #[error("Story part name error: {0}")]
    StoryPartName(String),

    #[error("Layer does not exist: {0}")]
    UnknownLayer(String),
}

impl Error {
    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        Error::UnexpectedStructure(message.into())
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

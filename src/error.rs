use thiserror::Error;

use crate::codec::WireFormat;
use crate::nullable::NullableError;
use crate::transport::TransportError;

/// Failure to encode or decode a resource descriptor.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JRD document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XRD document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid XRD attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid JRD property {property:?}: {source}")]
    Property {
        property: String,
        #[source]
        source: NullableError,
    },

    #[error("invalid XRD document: no root element")]
    MissingRoot,

    #[error("invalid XRD document: unexpected end of input")]
    UnexpectedEof,

    #[error("invalid XRD document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid XRD document: {attribute}=\"{value}\" is not a boolean")]
    InvalidBoolean { attribute: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-2xx response other than 404/410.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("webfinger response status error: {code} {status}")]
pub struct StatusError {
    pub url: String,
    pub code: u16,
    /// Standard reason phrase for `code`, not the server's own text. Empty
    /// for codes without one (e.g. 599).
    pub status: String,
}

/// Response media type with no matching codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported content type: {content_type}")]
pub struct UnsupportedContentTypeError {
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum WebFingerError {
    /// 404 Not Found and 410 Gone both map here.
    #[error("resource not found")]
    NotFound,

    #[error("webfinger request failed: {0}")]
    Transport(#[source] TransportError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("invalid Content-Type header: {0}")]
    ContentType(#[from] mime::FromStrError),

    #[error(transparent)]
    UnsupportedContentType(#[from] UnsupportedContentTypeError),

    #[error("failed to decode {format} response: {source}")]
    Decode {
        format: WireFormat,
        #[source]
        source: CodecError,
    },

    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    #[error("invalid host: {0:?}")]
    InvalidHost(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),
}

impl WebFingerError {
    /// True for the 404/410 outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn status_error(&self) -> Option<&StatusError> {
        match self {
            Self::Status(e) => Some(e),
            _ => None,
        }
    }

    /// The offending media type for an unsupported-content-type failure.
    pub fn unsupported_content_type(&self) -> Option<&str> {
        match self {
            Self::UnsupportedContentType(e) => Some(&e.content_type),
            _ => None,
        }
    }
}

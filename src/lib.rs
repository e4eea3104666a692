//! WebFinger (RFC 7033) client.
//!
//! A lookup fetches `/.well-known/webfinger?resource=...` from a host and
//! decodes the answer into a [`Message`], whether the server replied with JRD
//! (JSON) or XRD (XML).
//!
//! HTTP is handled by the caller through [`HttpTransport`]. This crate only
//! builds the request, maps the response status, and decodes the body.

mod client;
mod codec;
mod error;
mod jrd;
mod nullable;
mod transport;
mod types;
mod xrd;

pub use client::{AdditionalMediaTypes, Client, ClientOptions, ACCEPT_HEADER, WELL_KNOWN_PATH};
pub use codec::{
    Codec, JrdCodec, MediaTypeTable, WireFormat, XrdCodec, BUILTIN_JSON_MEDIA_TYPES,
    BUILTIN_XML_MEDIA_TYPES,
};
pub use error::{CodecError, StatusError, UnsupportedContentTypeError, WebFingerError};
pub use jrd::{decode_jrd, encode_jrd, JRD_MEDIA_TYPE};
pub use nullable::{NullableError, NullableString};
pub use transport::{HttpTransport, ResponseBody, TransportError};
pub use types::{Link, Message, Properties};
pub use xrd::{decode_xrd, encode_xrd, XRD_MEDIA_TYPE, XRD_NAMESPACE, XSI_NAMESPACE};

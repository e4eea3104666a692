//! Wire format selection.
//!
//! Each wire format is a [`Codec`]; the client picks one by looking up the
//! response media type in a [`MediaTypeTable`].

use std::fmt;

use crate::error::CodecError;
use crate::jrd::{decode_jrd, encode_jrd, JRD_MEDIA_TYPE};
use crate::types::Message;
use crate::xrd::{decode_xrd, encode_xrd, XRD_MEDIA_TYPE};

/// Media types understood as XRD without configuration.
pub const BUILTIN_XML_MEDIA_TYPES: &[&str] = &[XRD_MEDIA_TYPE, "application/xml", "text/xml"];

/// Media types understood as JRD without configuration.
pub const BUILTIN_JSON_MEDIA_TYPES: &[&str] = &[JRD_MEDIA_TYPE, "application/json"];

/// Encode/decode capability of one wire format.
pub trait Codec: Send + Sync {
    fn format(&self) -> WireFormat;
    fn encode(&self, message: &Message) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Message, CodecError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JrdCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrdCodec;

impl Codec for JrdCodec {
    fn format(&self) -> WireFormat {
        WireFormat::Jrd
    }

    fn encode(&self, message: &Message) -> Result<Vec<u8>, CodecError> {
        encode_jrd(message)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Message, CodecError> {
        decode_jrd(bytes)
    }
}

impl Codec for XrdCodec {
    fn format(&self) -> WireFormat {
        WireFormat::Xrd
    }

    fn encode(&self, message: &Message) -> Result<Vec<u8>, CodecError> {
        encode_xrd(message)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Message, CodecError> {
        decode_xrd(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Jrd,
    Xrd,
}

impl WireFormat {
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Self::Jrd => &JrdCodec,
            Self::Xrd => &XrdCodec,
        }
    }

    /// Canonical media type of the format.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Jrd => JRD_MEDIA_TYPE,
            Self::Xrd => XRD_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jrd => "JRD",
            Self::Xrd => "XRD",
        })
    }
}

/// Media type to wire format mapping: builtins plus caller extras.
///
/// XML entries are consulted before JSON entries, so a media type listed in
/// both resolves to XRD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeTable {
    entries: Vec<(String, WireFormat)>,
}

impl MediaTypeTable {
    pub fn new<X, J>(additional_xml: X, additional_json: J) -> Self
    where
        X: IntoIterator,
        X::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        let builtin = |types: &[&str], format| {
            types
                .iter()
                .map(move |t| (t.to_string(), format))
                .collect::<Vec<_>>()
        };

        let mut entries = builtin(BUILTIN_XML_MEDIA_TYPES, WireFormat::Xrd);
        entries.extend(additional_xml.into_iter().map(|t| (lowercase(t), WireFormat::Xrd)));
        entries.extend(builtin(BUILTIN_JSON_MEDIA_TYPES, WireFormat::Jrd));
        entries.extend(additional_json.into_iter().map(|t| (lowercase(t), WireFormat::Jrd)));
        Self { entries }
    }

    /// Wire format for an exact (parameter-free) media type.
    pub fn lookup(&self, media_type: &str) -> Option<WireFormat> {
        self.entries
            .iter()
            .find(|(t, _)| t == media_type)
            .map(|(_, format)| *format)
    }
}

// Parsed media types are lower-cased, so configured ones must be too.
fn lowercase(media_type: impl Into<String>) -> String {
    let mut media_type = media_type.into();
    media_type.make_ascii_lowercase();
    media_type
}

impl Default for MediaTypeTable {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), Vec::<String>::new())
    }
}

impl Message {
    pub fn to_jrd(&self) -> Result<Vec<u8>, CodecError> {
        JrdCodec.encode(self)
    }

    pub fn from_jrd(bytes: &[u8]) -> Result<Self, CodecError> {
        JrdCodec.decode(bytes)
    }

    pub fn to_xrd(&self) -> Result<Vec<u8>, CodecError> {
        XrdCodec.encode(self)
    }

    pub fn from_xrd(bytes: &[u8]) -> Result<Self, CodecError> {
        XrdCodec.decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let table = MediaTypeTable::default();
        assert_eq!(table.lookup("application/xrd+xml"), Some(WireFormat::Xrd));
        assert_eq!(table.lookup("application/xml"), Some(WireFormat::Xrd));
        assert_eq!(table.lookup("text/xml"), Some(WireFormat::Xrd));
        assert_eq!(table.lookup("application/jrd+json"), Some(WireFormat::Jrd));
        assert_eq!(table.lookup("application/json"), Some(WireFormat::Jrd));
        assert_eq!(table.lookup("text/plain"), None);
        assert_eq!(table.lookup("application/activity+json"), None);
    }

    #[test]
    fn extras_extend_builtins() {
        let table = MediaTypeTable::new(["application/x-xrd"], ["application/activity+json"]);
        assert_eq!(table.lookup("application/x-xrd"), Some(WireFormat::Xrd));
        assert_eq!(
            table.lookup("application/activity+json"),
            Some(WireFormat::Jrd)
        );
        assert_eq!(table.lookup("application/jrd+json"), Some(WireFormat::Jrd));
        assert_eq!(table.lookup("text/xml"), Some(WireFormat::Xrd));
    }

    #[test]
    fn extras_are_case_insensitive() {
        let table = MediaTypeTable::new(Vec::<String>::new(), ["Application/Activity+JSON"]);
        assert_eq!(
            table.lookup("application/activity+json"),
            Some(WireFormat::Jrd)
        );
    }

    #[test]
    fn xml_wins_when_listed_twice() {
        let table = MediaTypeTable::new(["application/x-both"], ["application/x-both"]);
        assert_eq!(table.lookup("application/x-both"), Some(WireFormat::Xrd));
    }

    #[test]
    fn codecs_report_their_format() {
        assert_eq!(WireFormat::Jrd.codec().format(), WireFormat::Jrd);
        assert_eq!(WireFormat::Xrd.codec().format(), WireFormat::Xrd);
        assert_eq!(WireFormat::Jrd.media_type(), "application/jrd+json");
        assert_eq!(WireFormat::Xrd.media_type(), "application/xrd+xml");
        assert_eq!(WireFormat::Xrd.to_string(), "XRD");
    }

    #[test]
    fn message_helpers_use_codecs() {
        let m = Message::new("acct:test@example.com");
        assert_eq!(Message::from_jrd(&m.to_jrd().unwrap()).unwrap(), m);
        assert_eq!(Message::from_xrd(&m.to_xrd().unwrap()).unwrap(), m);
    }
}

//! XRD (Extensible Resource Descriptor) encoding.
//!
//! ```xml
//! <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0"
//!      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!   <Subject>acct:alice@example.com</Subject>
//!   <Alias>https://example.com/@alice</Alias>
//!   <Property type="http://example.com/ns/name">Alice</Property>
//!   <Property type="http://example.com/ns/age" xsi:nil="true"/>
//!   <Link rel="self" type="application/activity+json" href="https://example.com/users/alice"/>
//! </XRD>
//! ```
//!
//! Decoding matches elements and link attributes by local name in any
//! namespace. A property is null when it carries `xsi:nil="true"` or
//! `nillable="true"`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use crate::error::CodecError;
use crate::nullable::NullableString;
use crate::types::{Link, Message};

pub const XRD_MEDIA_TYPE: &str = "application/xrd+xml";
pub const XRD_NAMESPACE: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

type Reader<'a> = NsReader<&'a [u8]>;

/// Encode a message as an XRD document.
///
/// Children are written as `Subject`, `Alias`*, `Property`* (ascending by
/// type), `Link`*. The `xsi` namespace is always declared on the root.
pub fn encode_xrd(message: &Message) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("XRD");
    root.push_attribute(("xmlns", XRD_NAMESPACE));
    root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    write_text_element(&mut writer, "Subject", &message.subject)?;
    for alias in &message.aliases {
        write_text_element(&mut writer, "Alias", alias)?;
    }

    for (type_, value) in &message.properties {
        let mut property = BytesStart::new("Property");
        property.push_attribute(("type", type_.as_str()));
        match value.as_option() {
            Some(text) => {
                writer.write_event(Event::Start(property))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("Property")))?;
            }
            None => {
                property.push_attribute(("xsi:nil", "true"));
                writer.write_event(Event::Empty(property))?;
            }
        }
    }

    for link in &message.links {
        let mut element = BytesStart::new("Link");
        for (name, value) in [("rel", &link.rel), ("type", &link.type_), ("href", &link.href)] {
            if !value.is_empty() {
                element.push_attribute((name, value.as_str()));
            }
        }
        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::End(BytesEnd::new("XRD")))?;
    Ok(writer.into_inner())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), CodecError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Decode an XRD document.
///
/// A repeated `Subject` keeps the last one; a repeated property type keeps
/// the last occurrence.
///
/// # Errors
/// Returns `CodecError` for malformed XML, a document without a root element,
/// or a nil attribute that is not a boolean.
pub fn decode_xrd(bytes: &[u8]) -> Result<Message, CodecError> {
    let mut reader = NsReader::from_reader(bytes);
    let mut message = Message::default();

    loop {
        match reader.read_event()? {
            Event::Start(_) => {
                decode_children(&mut reader, &mut message)?;
                return Ok(message);
            }
            Event::Empty(_) => return Ok(message),
            Event::Eof => return Err(CodecError::MissingRoot),
            _ => {}
        }
    }
}

fn decode_children(reader: &mut Reader<'_>, message: &mut Message) -> Result<(), CodecError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Subject" => message.subject = read_text(reader)?,
                b"Alias" => message.aliases.push(read_text(reader)?),
                b"Property" => {
                    let (type_, nil) = property_attributes(reader, &e)?;
                    let text = read_text(reader)?;
                    message.properties.insert(type_, property_value(nil, text));
                }
                b"Link" => {
                    message.links.push(link_attributes(&e)?);
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"Subject" => message.subject.clear(),
                b"Alias" => message.aliases.push(String::new()),
                b"Property" => {
                    let (type_, nil) = property_attributes(reader, &e)?;
                    message
                        .properties
                        .insert(type_, property_value(nil, String::new()));
                }
                b"Link" => message.links.push(link_attributes(&e)?),
                _ => {}
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(CodecError::UnexpectedEof),
            _ => {}
        }
    }
}

/// Character data directly inside the current element; nested elements are
/// skipped.
fn read_text(reader: &mut Reader<'_>) -> Result<String, CodecError> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Text(t) if depth == 0 => text.push_str(&t.unescape()?),
            Event::CData(c) if depth == 0 => text.push_str(std::str::from_utf8(&c)?),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => return Ok(text),
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(CodecError::UnexpectedEof),
            _ => {}
        }
    }
}

fn property_value(nil: bool, text: String) -> NullableString {
    let mut value = NullableString::null();
    if !nil {
        value.set_value(text);
    }
    value
}

fn property_attributes(
    reader: &Reader<'_>,
    element: &BytesStart<'_>,
) -> Result<(String, bool), CodecError> {
    let mut type_ = String::new();
    let mut xsi_nil = false;
    let mut nillable = false;

    for attr in element.attributes() {
        let attr = attr?;
        let (namespace, local) = reader.resolve_attribute(attr.key);
        match local.as_ref() {
            b"nil" if is_xsi(&namespace) => {
                xsi_nil = parse_bool("xsi:nil", &attr.unescape_value()?)?;
            }
            b"nillable" => nillable = parse_bool("nillable", &attr.unescape_value()?)?,
            b"type" => type_ = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }

    Ok((type_, xsi_nil || nillable))
}

fn is_xsi(namespace: &ResolveResult<'_>) -> bool {
    matches!(namespace, ResolveResult::Bound(Namespace(ns)) if *ns == XSI_NAMESPACE.as_bytes())
}

fn link_attributes(element: &BytesStart<'_>) -> Result<Link, CodecError> {
    let mut link = Link::default();
    for attr in element.attributes() {
        let attr = attr?;
        let slot = match attr.key.local_name().as_ref() {
            b"rel" => &mut link.rel,
            b"type" => &mut link.type_,
            b"href" => &mut link.href,
            _ => continue,
        };
        *slot = attr.unescape_value()?.into_owned();
    }
    Ok(link)
}

/// Accepts `1 t T true TRUE True` and `0 f F false FALSE False`; empty is false.
fn parse_bool(attribute: &'static str, value: &str) -> Result<bool, CodecError> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "" => Ok(false),
        other => Err(CodecError::InvalidBoolean {
            attribute,
            value: other.to_string(),
        }),
    }
}

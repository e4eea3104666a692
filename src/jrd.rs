//! JRD (JSON Resource Descriptor) encoding.
//!
//! Field mapping is carried by the serde derives on [`Message`]; properties
//! serialize in key order because they live in a `BTreeMap`.
//!
//! Decoding goes through [`serde_json::Value`] first so that a duplicated
//! member keeps its last value and a mistyped property surfaces as
//! [`CodecError::Property`] rather than as serde_json text.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::CodecError;
use crate::nullable::NullableString;
use crate::types::{Message, Properties};

pub const JRD_MEDIA_TYPE: &str = "application/jrd+json";

/// Encode a message as a JRD document.
pub fn encode_jrd(message: &Message) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a JRD document.
///
/// # Errors
/// Returns `CodecError::Json` for malformed JSON or mistyped members, and
/// `CodecError::Property` for a property value that is neither a string nor
/// null.
pub fn decode_jrd(bytes: &[u8]) -> Result<Message, CodecError> {
    let mut document: Value = serde_json::from_slice(bytes)?;
    let properties = document
        .as_object_mut()
        .and_then(|members| members.remove("properties"));

    let mut message: Message = serde_json::from_value(document)?;
    if let Some(properties) = properties {
        message.properties = decode_properties(properties)?;
    }
    Ok(message)
}

fn decode_properties(properties: Value) -> Result<Properties, CodecError> {
    let raw: Option<BTreeMap<String, Value>> = serde_json::from_value(properties)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(property, value)| match NullableString::try_from(&value) {
            Ok(value) => Ok((property, value)),
            Err(source) => Err(CodecError::Property { property, source }),
        })
        .collect()
}

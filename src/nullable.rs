//! A string that can be explicitly `null`.
//!
//! JRD properties distinguish between a property that carries a string
//! (possibly empty) and one that is present but `null`. XRD expresses the same
//! thing with `xsi:nil="true"`. `NullableString` is the in-memory form of both.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NullableError {
    #[error("incorrect value type: expected string or null, got {found}")]
    IncorrectValueType { found: &'static str },
}

/// Ternary string value: absent (`valid == false`) or present.
///
/// When `valid` is false the `value` payload is unobservable: accessors return
/// an empty string and equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct NullableString {
    pub valid: bool,
    pub value: String,
}

impl NullableString {
    /// A present value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            valid: true,
            value: value.into(),
        }
    }

    /// An explicit null.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.valid = true;
    }

    pub fn set_null(&mut self) {
        self.value.clear();
        self.valid = false;
    }

    /// True when the value is null.
    pub fn is_zero(&self) -> bool {
        !self.valid
    }

    /// The value, or `""` when null.
    pub fn string_or_zero(&self) -> &str {
        if self.valid {
            &self.value
        } else {
            ""
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        self.valid.then_some(self.value.as_str())
    }
}

impl PartialEq for NullableString {
    fn eq(&self, other: &Self) -> bool {
        self.valid == other.valid && (!self.valid || self.value == other.value)
    }
}

impl Eq for NullableString {}

impl From<&str> for NullableString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NullableString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Option<String>> for NullableString {
    fn from(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl TryFrom<&serde_json::Value> for NullableString {
    type Error = NullableError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(Self::new(s.as_str())),
            Value::Null => Ok(Self::null()),
            Value::Bool(_) => Err(NullableError::IncorrectValueType { found: "boolean" }),
            Value::Number(_) => Err(NullableError::IncorrectValueType { found: "number" }),
            Value::Array(_) => Err(NullableError::IncorrectValueType { found: "array" }),
            Value::Object(_) => Err(NullableError::IncorrectValueType { found: "object" }),
        }
    }
}

impl From<&NullableString> for serde_json::Value {
    fn from(value: &NullableString) -> Self {
        match value.as_option() {
            Some(s) => serde_json::Value::String(s.to_string()),
            None => serde_json::Value::Null,
        }
    }
}

impl Serialize for NullableString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_option() {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NullableString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NullableStringVisitor)
    }
}

struct NullableStringVisitor;

fn mismatch<E: de::Error>(found: &'static str) -> E {
    E::custom(NullableError::IncorrectValueType { found })
}

impl<'de> Visitor<'de> for NullableStringVisitor {
    type Value = NullableString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(NullableString::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(NullableString::new(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NullableString::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(NullableString::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Err(mismatch("boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Err(mismatch("number"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Err(mismatch("number"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Err(mismatch("number"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _: A) -> Result<Self::Value, A::Error> {
        Err(mismatch("array"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _: A) -> Result<Self::Value, A::Error> {
        Err(mismatch("object"))
    }
}

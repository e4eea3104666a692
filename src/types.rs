use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::nullable::NullableString;

/// Resource properties keyed by property type (usually a URI).
///
/// A key that is present is always emitted, either with its value or as an
/// explicit null. Keys iterate in ascending lexical order, which is the order
/// both wire formats write them in.
pub type Properties = BTreeMap<String, NullableString>;

/// RFC 7033 resource descriptor, independent of JRD or XRD encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(
        default,
        deserialize_with = "nulls_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub aliases: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub properties: Properties,
    #[serde(
        default,
        deserialize_with = "nulls_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
}

/// A link in a resource descriptor. Empty fields are omitted on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub rel: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub type_: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, type_: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            type_: type_.into(),
            href: href.into(),
        }
    }
}

impl Message {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Default::default()
        }
    }

    /// First link whose `type` equals `type_`.
    pub fn link_by_type(&self, type_: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.type_ == type_)
    }

    /// All links whose `type` equals `type_`, in document order.
    pub fn links_by_type(&self, type_: &str) -> Vec<&Link> {
        self.links.iter().filter(|link| link.type_ == type_).collect()
    }

    /// First link whose `rel` equals `rel`.
    pub fn first_link_by_relation(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel == rel)
    }

    /// All links whose `rel` equals `rel`, in document order.
    pub fn links_by_relation(&self, rel: &str) -> Vec<&Link> {
        self.links.iter().filter(|link| link.rel == rel).collect()
    }

    /// Value of a property, `None` when the property is absent or null.
    pub fn property(&self, type_: &str) -> Option<&str> {
        self.properties.get(type_).and_then(NullableString::as_option)
    }
}

// JRD producers sometimes write `null` for empty members.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Same for the elements of an array.
fn nulls_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

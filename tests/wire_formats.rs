//! Properties shared by the JRD and XRD encodings.

use std::collections::BTreeMap;

use less_webfinger::{
    decode_jrd, decode_xrd, encode_jrd, encode_xrd, Codec, JrdCodec, Link, Message,
    NullableString, Properties, XrdCodec,
};
use proptest::prelude::*;

fn fixture() -> Message {
    let mut properties = Properties::new();
    properties.insert("http://example.com/ns/role".into(), "admin".into());
    properties.insert("http://example.com/ns/age".into(), NullableString::null());
    properties.insert("http://example.com/ns/empty".into(), "".into());
    Message {
        subject: "acct:test@example.com".into(),
        aliases: vec![
            "https://example.com/@test".into(),
            "https://example.com/users/test".into(),
        ],
        properties,
        links: vec![
            Link::new("alternate", "text/html", "https://example.com/@test"),
            Link::new("self", "application/activity+json", "https://example.com/users/test"),
            Link::new("http://webfinger.net/rel/avatar", "", "https://example.com/a.png"),
        ],
    }
}

#[test]
fn cross_format_equivalence() {
    let m = fixture();
    let via_json = decode_jrd(&encode_jrd(&m).unwrap()).unwrap();
    let via_xml = decode_xrd(&encode_xrd(&m).unwrap()).unwrap();
    assert_eq!(via_json, via_xml);
    assert_eq!(via_json, m);
}

#[test]
fn codecs_are_interchangeable() {
    let m = fixture();
    let codecs: [&dyn Codec; 2] = [&JrdCodec, &XrdCodec];
    for codec in codecs {
        let decoded = codec.decode(&codec.encode(&m).unwrap()).unwrap();
        assert_eq!(decoded, m, "{}", codec.format());
    }
}

#[test]
fn absent_properties_are_never_written() {
    let m = Message::new("acct:test@example.com");
    let json = String::from_utf8(encode_jrd(&m).unwrap()).unwrap();
    let xml = String::from_utf8(encode_xrd(&m).unwrap()).unwrap();
    assert!(!json.contains("properties"));
    assert!(!xml.contains("<Property"));

    let m = fixture();
    let json = String::from_utf8(encode_jrd(&m).unwrap()).unwrap();
    let xml = String::from_utf8(encode_xrd(&m).unwrap()).unwrap();
    assert!(!json.contains("ns/missing"));
    assert!(!xml.contains("ns/missing"));
    assert_eq!(xml.matches("<Property").count(), 3);
}

#[test]
fn null_property_forms() {
    let m = fixture();
    let json = String::from_utf8(encode_jrd(&m).unwrap()).unwrap();
    let xml = String::from_utf8(encode_xrd(&m).unwrap()).unwrap();
    assert!(json.contains(r#""http://example.com/ns/age":null"#));
    assert!(xml.contains(r#"<Property type="http://example.com/ns/age" xsi:nil="true"/>"#));
}

/// Property types in the order they appear in an encoded document.
fn json_property_order(bytes: &[u8]) -> Vec<String> {
    let text = std::str::from_utf8(bytes).unwrap();
    let value: serde_json::Value = serde_json::from_str(text).unwrap();
    let Some(start) = text.find("\"properties\":") else {
        return Vec::new();
    };
    let section = &text[start..];
    let mut keys: Vec<(usize, String)> = value["properties"]
        .as_object()
        .unwrap()
        .keys()
        .map(|k| (section.find(&format!("\"{k}\":")).unwrap(), k.clone()))
        .collect();
    keys.sort();
    keys.into_iter().map(|(_, k)| k).collect()
}

fn xml_property_order(bytes: &[u8]) -> Vec<String> {
    let xml = std::str::from_utf8(bytes).unwrap();
    xml.split("<Property type=\"")
        .skip(1)
        .map(|rest| rest[..rest.find('"').unwrap()].to_string())
        .collect()
}

proptest! {
    #[test]
    fn properties_encode_in_ascending_order(
        entries in prop::collection::vec(("[a-z]{1,8}", proptest::option::of("[a-z0-9 ]{0,8}")), 0..12)
    ) {
        let mut m = Message::new("acct:test@example.com");
        for (key, value) in &entries {
            m.properties.insert(key.clone(), NullableString::from(value.clone()));
        }
        let expected: Vec<String> = m.properties.keys().cloned().collect();
        let mut sorted = expected.clone();
        sorted.sort();
        prop_assert_eq!(&expected, &sorted);

        let json = encode_jrd(&m).unwrap();
        let xml = encode_xrd(&m).unwrap();
        prop_assert_eq!(json_property_order(&json), sorted.clone());
        prop_assert_eq!(xml_property_order(&xml), sorted);

        prop_assert_eq!(decode_jrd(&json).unwrap(), m.clone());
        prop_assert_eq!(decode_xrd(&xml).unwrap(), m);
    }

    #[test]
    fn cross_format_round_trip(
        subject in "acct:[a-z]{1,8}@[a-z]{1,8}\\.com",
        aliases in prop::collection::vec("https://[a-z]{1,8}\\.com/[a-z@]{0,8}", 0..4),
        properties in prop::collection::btree_map("[a-z:/.]{1,12}", proptest::option::of("[a-zA-Z0-9 &<>'\"]{0,8}"), 0..6),
        links in prop::collection::vec(("[a-z]{0,6}", "[a-z/+]{0,12}", "[a-z:/.]{0,16}"), 0..4),
    ) {
        let m = Message {
            subject,
            aliases,
            properties: properties
                .into_iter()
                .map(|(k, v)| (k, NullableString::from(v)))
                .collect::<BTreeMap<_, _>>(),
            links: links
                .into_iter()
                .map(|(rel, type_, href)| Link::new(rel, type_, href))
                .collect(),
        };
        let via_json = decode_jrd(&encode_jrd(&m).unwrap()).unwrap();
        let via_xml = decode_xrd(&encode_xrd(&m).unwrap()).unwrap();
        prop_assert_eq!(&via_json, &m);
        prop_assert_eq!(&via_xml, &m);
    }
}

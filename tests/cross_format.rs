//! Conversions between XRD and JRD.
//!
//! The RFC 6415 examples (sections 3 and 4) describe the same resource in
//! both formats, so converting one must produce the other.

use serde_json::Value;
use xrd::ir::io_jrd_json::to_jrd_string_compact;
use xrd::ir::{PropertyValue, Title};
use xrd::{parse_json, parse_xml, render_json, render_xml, Xrd};

const RFC6415_XRD: &str = include_str!("fixtures/rfc6415.xrd");
const RFC6415_JRD: &str = include_str!("fixtures/rfc6415.jrd");

fn json_value(json: &str) -> Value {
    serde_json::from_str(json).expect("valid json")
}

#[test]
fn rfc6415_xrd_converts_to_rfc6415_jrd() {
    let xrd = parse_xml(RFC6415_XRD).expect("parse xrd");
    let json = render_json(&xrd).expect("render jrd");
    assert_eq!(json_value(&json), json_value(RFC6415_JRD));
}

#[test]
fn rfc6415_jrd_converts_to_equivalent_xrd() {
    let from_json = parse_json(RFC6415_JRD).expect("parse jrd");
    let xml = render_xml(&from_json).expect("render xrd");
    let reparsed = parse_xml(&xml).expect("reparse xrd");
    assert_eq!(reparsed, from_json);

    // Back to JSON once more: nothing left to collapse.
    let json = render_json(&reparsed).expect("render jrd");
    assert_eq!(json_value(&json), json_value(RFC6415_JRD));
}

#[test]
fn jrd_to_xrd_keeps_default_title_and_nil() {
    let xml = render_xml(&parse_json(RFC6415_JRD).expect("parse jrd")).expect("render xrd");

    assert!(xml.contains("    <Title>About the Author</Title>"));
    assert!(xml.contains("    <Title xml:lang=\"en-us\">Author Information</Title>"));
    assert!(xml.contains("  <Property type=\"http://blgx.example.net/ns/ext\" xsi:nil=\"true\"/>"));
    assert_eq!(xml.matches("xmlns:xsi=").count(), 1);
}

#[test]
fn multiple_values_collapse_in_json_only() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
  <Property type="http://spec.example.net/version">1.0</Property>
  <Property type="http://spec.example.net/version">2.0</Property>
</XRD>"#;
    let xrd = parse_xml(xml).expect("parse xrd");

    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render jrd"),
        r#"{"properties":{"http://spec.example.net/version":"2.0"}}"#
    );

    let rendered = render_xml(&xrd).expect("render xrd");
    let first = rendered
        .find("<Property type=\"http://spec.example.net/version\">1.0</Property>")
        .expect("first value kept");
    let second = rendered
        .find("<Property type=\"http://spec.example.net/version\">2.0</Property>")
        .expect("second value kept");
    assert!(first < second);
}

#[test]
fn nil_propagates_through_both_formats() {
    let xml = r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
  <Property type="mimetype"/>
</XRD>"#;
    let xrd = parse_xml(xml).expect("parse xrd");
    assert_eq!(xrd.properties.get("mimetype"), Some(&PropertyValue::nil()));

    let rendered = render_xml(&xrd).expect("render xrd");
    assert_eq!(rendered.matches("xmlns:xsi=").count(), 1);
    assert!(rendered.contains("<Property type=\"mimetype\" xsi:nil=\"true\"/>"));

    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render jrd"),
        r#"{"properties":{"mimetype":null}}"#
    );

    let from_json = parse_json(r#"{"properties":{"mimetype":null}}"#).expect("parse jrd");
    assert_eq!(from_json, xrd);
}

#[test]
fn empty_json_string_becomes_xml_nil() {
    let xrd = parse_json(r#"{"properties":{"mimetype":""}}"#).expect("parse jrd");
    let back = parse_xml(&render_xml(&xrd).expect("render xrd")).expect("reparse xrd");
    assert_eq!(back.properties.get("mimetype"), Some(&PropertyValue::nil()));
}

#[test]
fn unknown_content_is_tolerated_in_both_formats() {
    let xml = r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
  <Subject>http://example.com/</Subject>
  <Pineapple>yes</Pineapple>
</XRD>"#;
    let json = r#"{"subject":"http://example.com/","pineapple":"yes"}"#;

    assert_eq!(
        parse_xml(xml).expect("parse xrd"),
        parse_json(json).expect("parse jrd")
    );
}

#[test]
fn duplicate_title_language_keeps_last_in_json() {
    let xml = r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
  <Link rel="author">
    <Title xml:lang="de">Erster</Title>
    <Title>Default</Title>
    <Title xml:lang="de">Zweiter</Title>
  </Link>
</XRD>"#;
    let xrd = parse_xml(xml).expect("parse xrd");
    assert_eq!(xrd.links[0].titles.len(), 3);

    let from_json = parse_json(&render_json(&xrd).expect("render jrd")).expect("parse jrd");
    assert_eq!(
        from_json.links[0].titles,
        vec![Title::with_lang("Zweiter", "de"), Title::new("Default")]
    );
}

#[test]
fn xml_only_fields_are_dropped_in_json() {
    let xml = r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0"
        xmlns:foo="http://example.com/foo" xml:id="doc-1">
  <Subject>http://example.com/</Subject>
</XRD>"#;
    let xrd = parse_xml(xml).expect("parse xrd");
    assert_eq!(xrd.document_id.as_deref(), Some("doc-1"));

    let back = parse_json(&render_json(&xrd).expect("render jrd")).expect("parse jrd");
    assert_eq!(back, Xrd::new().with_subject("http://example.com/"));
}

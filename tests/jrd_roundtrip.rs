//! JRD JSON reader/writer integration tests.

use std::path::Path;

use xrd::ir::io_jrd_json::{
    from_jrd_slice, from_jrd_str, read_jrd, to_jrd_string, to_jrd_string_compact, write_jrd,
};
use xrd::ir::{Link, PropertyValue, Title, Xrd};
use xrd::XrdError;

fn webfinger() -> Xrd {
    read_jrd(Path::new("tests/fixtures/webfinger.jrd")).expect("read webfinger fixture")
}

#[test]
fn reads_webfinger_fixture() {
    let xrd = webfinger();

    assert_eq!(xrd.subject.as_deref(), Some("acct:bob@example.com"));
    assert_eq!(xrd.aliases, vec!["https://www.example.com/~bob/"]);
    assert_eq!(
        xrd.properties.get("http://example.com/ns/role"),
        Some(&PropertyValue::value("employee"))
    );
    assert_eq!(xrd.links.len(), 2);
    assert_eq!(xrd.links[0].media_type.as_deref(), Some("image/jpeg"));
    assert_eq!(xrd.document_id, None);
    assert!(xrd.attributes.is_empty());
}

#[test]
fn webfinger_survives_render_and_reparse() {
    let original = webfinger();
    let pretty = to_jrd_string(&original).expect("render pretty");
    assert_eq!(from_jrd_str(&pretty).expect("reparse pretty"), original);

    let compact = to_jrd_string_compact(&original).expect("render compact");
    assert_eq!(from_jrd_str(&compact).expect("reparse compact"), original);
}

#[test]
fn pretty_output_matches_fixture_shape() {
    let rendered = to_jrd_string(&webfinger()).expect("render");
    let fixture = std::fs::read_to_string("tests/fixtures/webfinger.jrd").expect("read fixture");

    let rendered: serde_json::Value = serde_json::from_str(&rendered).expect("rendered json");
    let fixture: serde_json::Value = serde_json::from_str(&fixture).expect("fixture json");
    assert_eq!(rendered, fixture);
}

#[test]
fn compact_output_keeps_key_order() {
    let xrd = Xrd::new()
        .with_property("http://spec.example.net/version", "2.0")
        .with_alias("https://example.com/someone")
        .with_subject("acct:someone@example.com")
        .with_link(
            Link::new("http://webfinger.net/rel/profile-page")
                .with_href("https://example.com/someone")
                .with_media_type("text/html"),
        );

    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render"),
        concat!(
            r#"{"subject":"acct:someone@example.com","#,
            r#""aliases":["https://example.com/someone"],"#,
            r#""properties":{"http://spec.example.net/version":"2.0"},"#,
            r#""links":[{"rel":"http://webfinger.net/rel/profile-page","type":"text/html","href":"https://example.com/someone"}]}"#
        )
    );
}

#[test]
fn empty_fields_are_omitted() {
    assert_eq!(to_jrd_string_compact(&Xrd::new()).expect("render"), "{}");

    let xrd = Xrd::new().with_link(Link::new("author"));
    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render"),
        r#"{"links":[{"rel":"author"}]}"#
    );
}

#[test]
fn empty_link_object_is_kept() {
    let xrd = from_jrd_str(r#"{"links":[{}]}"#).expect("parse");
    assert_eq!(xrd.links, vec![Link::default()]);
    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render"),
        r#"{"links":[{}]}"#
    );
}

#[test]
fn default_title_key_maps_to_empty_language() {
    let xrd = from_jrd_str(
        r#"{"links":[{"rel":"author","titles":{"default":"Author","de":"Autor"}}]}"#,
    )
    .expect("parse");

    assert_eq!(
        xrd.links[0].titles,
        vec![Title::new("Author"), Title::with_lang("Autor", "de")]
    );
    assert!(xrd.links[0].titles[0].is_default());
}

#[test]
fn unknown_keys_are_ignored() {
    let xrd = from_jrd_str(
        r#"{
            "subject": "acct:someone@example.com",
            "pineapple": {"ripe": true},
            "links": [{"rel": "author", "pineapple": [1, 2, 3]}]
        }"#,
    )
    .expect("parse");

    assert_eq!(xrd.subject.as_deref(), Some("acct:someone@example.com"));
    assert_eq!(xrd.links, vec![Link::new("author")]);
}

#[test]
fn multi_valued_property_renders_last_value() {
    let xrd = Xrd::new().with_property(
        "http://spec.example.net/version",
        PropertyValue::Multiple(vec![Some("1.0".into()), Some("2.0".into())]),
    );
    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render"),
        r#"{"properties":{"http://spec.example.net/version":"2.0"}}"#
    );
}

#[test]
fn empty_href_does_not_conflict_with_template() {
    let xrd = from_jrd_str(r#"{"links":[{"rel":"a","href":"","template":"t{uri}"}]}"#)
        .expect("empty href is unset");
    assert_eq!(xrd.links[0].href, None);
    assert_eq!(xrd.links[0].template.as_deref(), Some("t{uri}"));

    let xml = xrd::parse_xml(
        r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0"><Link rel="a" href="" template="t{uri}"/></XRD>"#,
    )
    .expect("parse xrd");
    assert_eq!(xml, xrd);
}

#[test]
fn empty_rel_roundtrips_as_unset() {
    let xrd = from_jrd_str(r#"{"links":[{"rel":""}]}"#).expect("parse");
    assert_eq!(xrd.links, vec![Link::default()]);

    let compact = to_jrd_string_compact(&xrd).expect("render");
    assert_eq!(compact, r#"{"links":[{}]}"#);
    assert_eq!(from_jrd_str(&compact).expect("reparse"), xrd);
}

#[test]
fn empty_property_array_is_dropped_in_both_formats() {
    let xrd = from_jrd_str(r#"{"properties":{"p":[],"mimetype":"text/plain"}}"#).expect("parse");
    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render jrd"),
        r#"{"properties":{"mimetype":"text/plain"}}"#
    );

    let via_xml = xrd::parse_xml(&xrd::render_xml(&xrd).expect("render xrd")).expect("reparse xrd");
    assert_eq!(via_xml, xrd);
}

#[test]
fn href_and_template_together_fail_to_parse() {
    let err = read_jrd(Path::new("tests/fixtures/conflict.jrd")).unwrap_err();
    assert!(matches!(
        err,
        XrdError::ValidationFailed { error_count: 1, .. }
    ));
}

#[test]
fn href_and_template_together_fail_to_render() {
    let mut link = Link::new("lrdd").with_template("http://example.com/lrdd?uri={uri}");
    link.href = Some("http://example.com/lrdd".to_string());

    let err = to_jrd_string(&Xrd::new().with_link(link)).unwrap_err();
    assert!(matches!(err, XrdError::ValidationFailed { .. }));
}

#[test]
fn malformed_json_is_rejected() {
    let err = from_jrd_str(r#"{"subject": "#).unwrap_err();
    assert!(matches!(err, XrdError::JrdJsonParse { .. }));

    let err = from_jrd_slice(br#"{"aliases": "not-an-array"}"#).unwrap_err();
    assert!(matches!(err, XrdError::JrdJsonParse { .. }));
}

#[test]
fn invalid_expires_is_rejected() {
    let err = from_jrd_str(r#"{"expires": "yesterday"}"#).unwrap_err();
    match err {
        XrdError::InvalidExpires { value, .. } => assert_eq!(value, "yesterday"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn expires_offset_is_normalized_to_utc() {
    let xrd = from_jrd_str(r#"{"expires": "2010-01-30T10:30:00+01:00"}"#).expect("parse");
    assert_eq!(
        to_jrd_string_compact(&xrd).expect("render"),
        r#"{"expires":"2010-01-30T09:30:00Z"}"#
    );
}

#[test]
fn write_and_read_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("webfinger.jrd");

    let original = webfinger();
    write_jrd(&path, &original).expect("write jrd");
    let restored = read_jrd(&path).expect("read jrd");
    assert_eq!(restored, original);
}

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use xrd::ir::{Link, Properties, PropertyValue, Title, Xrd};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Non-empty text with no surrounding whitespace, including characters
/// that need escaping in XML.
pub fn text_strategy() -> BoxedStrategy<String> {
    "[a-zA-Z0-9&<>:/._?=-]{1,16}".boxed()
}

pub fn uri_strategy() -> BoxedStrategy<String> {
    "[a-z]{1,8}"
        .prop_map(|path| format!("http://example.com/{path}"))
        .boxed()
}

/// Either the default language or a two-letter tag.
pub fn lang_strategy() -> BoxedStrategy<String> {
    prop_oneof![Just(String::new()), "[a-z]{2}"].boxed()
}

/// Whole seconds between 1970 and 2100.
pub fn expires_strategy() -> BoxedStrategy<DateTime<Utc>> {
    (0i64..4_102_444_800)
        .prop_filter_map("timestamp in range", |secs| {
            DateTime::from_timestamp(secs, 0)
        })
        .boxed()
}

fn value_strategy() -> BoxedStrategy<Option<String>> {
    prop::option::of(text_strategy()).boxed()
}

/// A property value; `Multiple` only when `allow_multiple` and with at
/// least two entries, since one entry reads back as `Single`.
pub fn property_value_strategy(allow_multiple: bool) -> BoxedStrategy<PropertyValue> {
    if allow_multiple {
        prop_oneof![
            3 => value_strategy().prop_map(PropertyValue::Single),
            1 => prop::collection::vec(value_strategy(), 2..4).prop_map(PropertyValue::Multiple),
        ]
        .boxed()
    } else {
        value_strategy().prop_map(PropertyValue::Single).boxed()
    }
}

pub fn properties_strategy(allow_multiple: bool) -> BoxedStrategy<Properties> {
    prop::collection::vec(
        (uri_strategy(), property_value_strategy(allow_multiple)),
        0..4,
    )
    .prop_map(|entries| entries.into_iter().collect())
    .boxed()
}

/// Titles with distinct languages; JRD keys titles by language.
pub fn titles_strategy() -> BoxedStrategy<Vec<Title>> {
    prop::collection::btree_map(lang_strategy(), text_strategy(), 0..3)
        .prop_map(|titles| {
            titles
                .into_iter()
                .map(|(lang, value)| Title { value, lang })
                .collect()
        })
        .boxed()
}

/// A valid link: at most one of `href` and `template`.
pub fn link_strategy(allow_multiple: bool) -> BoxedStrategy<Link> {
    let target = prop_oneof![
        Just((None, None)),
        uri_strategy().prop_map(|href| (Some(href), None)),
        text_strategy().prop_map(|template| (None, Some(format!("{template}{{uri}}")))),
    ];

    (
        prop::option::of(uri_strategy()),
        prop::option::of("[a-z]{1,8}/[a-z+]{1,8}"),
        target,
        titles_strategy(),
        properties_strategy(allow_multiple),
    )
        .prop_map(|(rel, media_type, (href, template), titles, properties)| Link {
            rel,
            media_type,
            href,
            template,
            titles,
            properties,
        })
        .boxed()
}

/// A document that survives a JRD round trip unchanged: no document id,
/// no root attributes, no multi-valued properties.
pub fn arb_jrd_xrd() -> BoxedStrategy<Xrd> {
    (
        prop::option::of(expires_strategy()),
        prop::option::of(text_strategy()),
        prop::collection::vec(uri_strategy(), 0..3),
        properties_strategy(false),
        prop::collection::vec(link_strategy(false), 0..4),
    )
        .prop_map(|(expires, subject, aliases, properties, links)| Xrd {
            document_id: None,
            expires,
            subject,
            aliases,
            properties,
            links,
            attributes: Default::default(),
        })
        .boxed()
}

/// A document that survives an XRD round trip unchanged.
///
/// Adds a document id, at most one plain root attribute, an optional
/// `xsi:schemaLocation`, and multi-valued properties on top of
/// [`arb_jrd_xrd`].
pub fn arb_xrd() -> BoxedStrategy<Xrd> {
    (
        arb_jrd_xrd(),
        prop::option::of("[a-z]{1,8}"),
        prop::option::of(("[a-z]{1,8}", text_strategy())),
        prop::option::of(uri_strategy()),
        properties_strategy(true),
        prop::collection::vec(link_strategy(true), 0..4),
    )
        .prop_map(
            |(base, document_id, attribute, schema_location, properties, links)| {
                let mut xrd = Xrd {
                    document_id,
                    properties,
                    links,
                    ..base
                };
                if let Some((name, value)) = attribute {
                    xrd.attributes.insert(format!("ext{name}"), value);
                }
                if let Some(location) = schema_location {
                    xrd.attributes
                        .insert("xsi:schemaLocation".to_string(), location);
                }
                xrd
            },
        )
        .boxed()
}

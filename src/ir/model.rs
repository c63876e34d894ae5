//! Core document model for XRD and JRD.
//!
//! Both wire formats parse into these types and render out of them. The
//! model is permissive: it can hold a link with both `href` and `template`
//! set, so that validation can report the conflict instead of construction
//! panicking.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::property::{Properties, PropertyValue};

/// An Extensible Resource Descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Xrd {
    /// Opaque identifier from the root `xml:id` attribute. XML only.
    pub document_id: Option<String>,

    /// Instant after which the document is stale.
    pub expires: Option<DateTime<Utc>>,

    /// The URI this document describes.
    pub subject: Option<String>,

    /// Equivalent URIs for the subject, in document order.
    pub aliases: Vec<String>,

    /// Document-level properties.
    pub properties: Properties,

    /// Links, in document order.
    pub links: Vec<Link>,

    /// Extra root attributes and namespace declarations, keyed by prefixed
    /// name (e.g. `xmlns:foo`). XML only.
    pub attributes: IndexMap<String, String>,
}

impl Xrd {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document id.
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the expiry instant.
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Appends an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets a document-level property, replacing any previous value.
    pub fn with_property(
        mut self,
        type_uri: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(type_uri, value);
        self
    }

    /// Appends a link.
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Sets a passthrough root attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// True if the document or any of its links carries a nil property.
    pub fn has_nil_property(&self) -> bool {
        self.properties.has_nil() || self.links.iter().any(|link| link.properties.has_nil())
    }
}

/// One relation entry pointing to, or templating, a related resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    /// Relation type (`rel`).
    pub rel: Option<String>,

    /// Media type of the target (`type` on the wire).
    pub media_type: Option<String>,

    /// Target URI. Mutually exclusive with `template`.
    pub href: Option<String>,

    /// URI template. Mutually exclusive with `href`.
    pub template: Option<String>,

    /// Human-readable titles, in document order.
    pub titles: Vec<Title>,

    /// Link-level properties.
    pub properties: Properties,
}

impl Link {
    /// Creates a link with the given relation type.
    pub fn new(rel: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            ..Default::default()
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_title(mut self, title: Title) -> Self {
        self.titles.push(title);
        self
    }

    /// Sets a link property, replacing any previous value.
    pub fn with_property(
        mut self,
        type_uri: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(type_uri, value);
        self
    }

    /// Looks up a wire attribute by name (`rel`, `type`, `href`, `template`).
    ///
    /// Unknown names and unset attributes both yield `None`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let value = match name {
            "rel" => &self.rel,
            "type" => &self.media_type,
            "href" => &self.href,
            "template" => &self.template,
            _ => return None,
        };
        value.as_deref()
    }

    /// True if both `href` and `template` hold a non-empty value.
    pub fn has_target_conflict(&self) -> bool {
        let is_set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        is_set(&self.href) && is_set(&self.template)
    }
}

/// A link title with its language tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Title {
    pub value: String,

    /// `xml:lang` value; empty means the default title.
    pub lang: String,
}

impl Title {
    /// Creates a default-language title.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: String::new(),
        }
    }

    /// Creates a title for a specific language.
    pub fn with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: lang.into(),
        }
    }

    /// True when the title has no language tag.
    pub fn is_default(&self) -> bool {
        self.lang.is_empty()
    }
}

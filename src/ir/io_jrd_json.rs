//! JRD JSON reader and writer.
//!
//! JRD is the JSON form of an XRD document (RFC 6415, section 4). It has no
//! place for the document id or root attributes, keys titles by language, and
//! holds one value per property type.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{Link, Title, Xrd};
use super::property::{Properties, PropertyValue};
use super::timestamp::{format_expires, parse_expires};
use crate::error::XrdError;
use crate::validation::ensure_valid;

/// JRD key standing in for the empty (default) title language.
pub const DEFAULT_TITLE_KEY: &str = "default";

// ============================================================================
// JRD schema types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct JrdDocument {
    #[serde(default)]
    expires: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    properties: IndexMap<String, JrdPropertyValue>,
    #[serde(default)]
    links: Vec<JrdLink>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JrdLink {
    #[serde(default)]
    rel: Option<String>,
    #[serde(default, rename = "type")]
    media_type: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    titles: IndexMap<String, String>,
    #[serde(default)]
    properties: IndexMap<String, JrdPropertyValue>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// A property value as it appears on the wire: a string, null, or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JrdPropertyValue {
    Single(Option<String>),
    Multiple(Vec<Option<String>>),
}

#[derive(Debug, Serialize)]
struct JrdDocumentOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aliases: Vec<&'a str>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<&'a str, Option<&'a str>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    links: Vec<JrdLinkOut<'a>>,
}

#[derive(Debug, Serialize)]
struct JrdLinkOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rel: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    titles: IndexMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<&'a str, Option<&'a str>>,
}

// ============================================================================
// Public API
// ============================================================================

/// Read a JRD document from a file.
pub fn read_jrd(path: &Path) -> Result<Xrd, XrdError> {
    let file = File::open(path).map_err(XrdError::Io)?;
    let reader = BufReader::new(file);

    let document: JrdDocument =
        serde_json::from_reader(reader).map_err(|source| XrdError::JrdJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    jrd_to_xrd(document)
}

/// Write a document to a file as pretty-printed JRD.
pub fn write_jrd(path: &Path, xrd: &Xrd) -> Result<(), XrdError> {
    let json = to_jrd_string(xrd)?;
    fs::write(path, json).map_err(XrdError::Io)
}

/// Parse JRD from a string.
pub fn from_jrd_str(json: &str) -> Result<Xrd, XrdError> {
    parse_jrd_json_str(json, Path::new("<string>"))
}

/// Parse JRD from bytes.
pub fn from_jrd_slice(bytes: &[u8]) -> Result<Xrd, XrdError> {
    let document: JrdDocument =
        serde_json::from_slice(bytes).map_err(|source| XrdError::JrdJsonParse {
            path: PathBuf::from("<bytes>"),
            source,
        })?;
    jrd_to_xrd(document)
}

/// Serialize a document to a pretty-printed JRD string.
pub fn to_jrd_string(xrd: &Xrd) -> Result<String, XrdError> {
    let document = xrd_to_jrd(xrd)?;
    serde_json::to_string_pretty(&document).map_err(|source| XrdError::JrdJsonWrite { source })
}

/// Serialize a document to a single-line JRD string.
pub fn to_jrd_string_compact(xrd: &Xrd) -> Result<String, XrdError> {
    let document = xrd_to_jrd(xrd)?;
    serde_json::to_string(&document).map_err(|source| XrdError::JrdJsonWrite { source })
}

/// Serialize one link as a pretty-printed JRD link object.
pub fn link_to_jrd_string(link: &Link) -> Result<String, XrdError> {
    serde_json::to_string_pretty(&link_out(link))
        .map_err(|source| XrdError::JrdJsonWrite { source })
}

// ============================================================================
// Conversion
// ============================================================================

fn parse_jrd_json_str(json: &str, path: &Path) -> Result<Xrd, XrdError> {
    let document: JrdDocument =
        serde_json::from_str(json).map_err(|source| XrdError::JrdJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    jrd_to_xrd(document)
}

fn jrd_to_xrd(document: JrdDocument) -> Result<Xrd, XrdError> {
    for key in document.unknown.keys() {
        debug!(key = key.as_str(), "ignoring unrecognized JRD key");
    }

    let expires = document
        .expires
        .as_deref()
        .map(parse_expires)
        .transpose()?;

    let xrd = Xrd {
        document_id: None,
        expires,
        subject: document.subject,
        aliases: document.aliases,
        properties: properties_from_jrd(document.properties),
        links: document.links.into_iter().map(link_from_jrd).collect(),
        attributes: IndexMap::new(),
    };

    ensure_valid(&xrd)?;
    debug!(
        aliases = xrd.aliases.len(),
        properties = xrd.properties.len(),
        links = xrd.links.len(),
        "parsed JRD document"
    );
    Ok(xrd)
}

fn link_from_jrd(link: JrdLink) -> Link {
    for key in link.unknown.keys() {
        debug!(key = key.as_str(), "ignoring unrecognized JRD link key");
    }

    let titles = link
        .titles
        .into_iter()
        .map(|(lang, value)| {
            if lang == DEFAULT_TITLE_KEY {
                Title::new(value)
            } else {
                Title::with_lang(value, lang)
            }
        })
        .collect();

    Link {
        rel: unset_if_empty(link.rel),
        media_type: unset_if_empty(link.media_type),
        href: unset_if_empty(link.href),
        template: unset_if_empty(link.template),
        titles,
        properties: properties_from_jrd(link.properties),
    }
}

/// Arrays stay multi-valued so they can still be written back out as
/// repeated XRD elements. An empty array carries no value at all and reads
/// as an absent property.
fn properties_from_jrd(raw: IndexMap<String, JrdPropertyValue>) -> Properties {
    raw.into_iter()
        .filter_map(|(type_uri, value)| {
            let value = match value {
                JrdPropertyValue::Single(value) => PropertyValue::Single(value),
                JrdPropertyValue::Multiple(values) if values.is_empty() => {
                    debug!(property = type_uri.as_str(), "dropping empty JRD property array");
                    return None;
                }
                JrdPropertyValue::Multiple(values) => PropertyValue::from_values(values),
            };
            Some((type_uri, value))
        })
        .collect()
}

fn xrd_to_jrd(xrd: &Xrd) -> Result<JrdDocumentOut<'_>, XrdError> {
    ensure_valid(xrd)?;
    debug!(links = xrd.links.len(), "rendering JRD document");

    Ok(JrdDocumentOut {
        subject: non_empty(&xrd.subject),
        expires: xrd.expires.as_ref().map(format_expires),
        aliases: xrd.aliases.iter().map(String::as_str).collect(),
        properties: properties_out(&xrd.properties),
        links: xrd.links.iter().map(link_out).collect(),
    })
}

fn link_out(link: &Link) -> JrdLinkOut<'_> {
    let mut titles = IndexMap::new();
    for title in &link.titles {
        let key = if title.is_default() {
            DEFAULT_TITLE_KEY
        } else {
            title.lang.as_str()
        };
        titles.insert(key, title.value.as_str());
    }

    JrdLinkOut {
        rel: non_empty(&link.rel),
        media_type: non_empty(&link.media_type),
        href: non_empty(&link.href),
        template: non_empty(&link.template),
        titles,
        properties: properties_out(&link.properties),
    }
}

/// Valueless entries are skipped, matching the XRD writer, which has no
/// element to write for them.
fn properties_out(properties: &Properties) -> IndexMap<&str, Option<&str>> {
    properties
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(type_uri, value)| (type_uri, value.collapsed()))
        .collect()
}

/// Empty link attributes read as unset, as they do in XRD.
fn unset_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

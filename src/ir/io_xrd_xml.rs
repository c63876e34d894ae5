//! XRD XML reader and writer.
//!
//! Reading goes through `roxmltree`; children of the root and of each
//! `<Link>` are dispatched by local name, and unknown elements are skipped so
//! that extended documents still parse. Writing builds the document as a
//! string with two-space indentation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::model::{Link, Title, Xrd};
use super::property::{is_nil, Properties};
use super::timestamp::{format_expires, parse_expires};
use crate::error::XrdError;
use crate::validation::ensure_valid;

/// The XRD 1.0 namespace.
pub const XRD_NAMESPACE: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";
/// Namespace of the `nil` marker attribute.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// The reserved `xml:` namespace (`xml:id`, `xml:lang`).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Read an XRD document from a file.
pub fn read_xrd(path: &Path) -> Result<Xrd, XrdError> {
    let xml = fs::read_to_string(path).map_err(XrdError::Io)?;
    parse_xrd_xml_str(&xml, path)
}

/// Write a document to a file as XRD.
pub fn write_xrd(path: &Path, xrd: &Xrd) -> Result<(), XrdError> {
    let xml = build_xrd_xml(xrd)?;
    fs::write(path, xml).map_err(XrdError::Io)
}

/// Parse XRD from a string.
pub fn from_xrd_str(xml: &str) -> Result<Xrd, XrdError> {
    parse_xrd_xml_str(xml, Path::new("<string>"))
}

/// Parse XRD from bytes (must be valid UTF-8).
pub fn from_xrd_slice(bytes: &[u8]) -> Result<Xrd, XrdError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| XrdError::XrdXmlParse {
        path: PathBuf::from("<bytes>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_xrd_xml_str(xml, Path::new("<bytes>"))
}

/// Serialize a document to an XRD string.
pub fn to_xrd_string(xrd: &Xrd) -> Result<String, XrdError> {
    build_xrd_xml(xrd)
}

/// Child elements the reader understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum XrdElement {
    Expires,
    Subject,
    Alias,
    Property,
    Link,
    Title,
    Unknown,
}

impl XrdElement {
    fn classify(node: Node<'_, '_>) -> Self {
        match node.tag_name().name() {
            "Expires" => Self::Expires,
            "Subject" => Self::Subject,
            "Alias" => Self::Alias,
            "Property" => Self::Property,
            "Link" => Self::Link,
            "Title" => Self::Title,
            _ => Self::Unknown,
        }
    }
}

fn parse_xrd_xml_str(xml: &str, path: &Path) -> Result<Xrd, XrdError> {
    let document = Document::parse(xml).map_err(|source| XrdError::XrdXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let root = document.root_element();
    if root.tag_name().name() != "XRD" {
        return Err(XrdError::XrdXmlParse {
            path: path.to_path_buf(),
            message: "missing <XRD> root element".to_string(),
        });
    }
    if root.tag_name().namespace() != Some(XRD_NAMESPACE) {
        warn!(
            namespace = root.tag_name().namespace().unwrap_or(""),
            "XRD root element is not in the XRD namespace"
        );
    }

    let mut xrd = Xrd {
        document_id: root.attribute((XML_NAMESPACE, "id")).map(str::to_owned),
        attributes: root_attributes(root),
        ..Default::default()
    };

    for child in root.children().filter(Node::is_element) {
        match XrdElement::classify(child) {
            XrdElement::Expires => {
                let raw = node_text(child).ok_or_else(|| XrdError::XrdXmlParse {
                    path: path.to_path_buf(),
                    message: "empty <Expires> element".to_string(),
                })?;
                xrd.expires = Some(parse_expires(&raw)?);
            }
            XrdElement::Subject => xrd.subject = node_text(child),
            XrdElement::Alias => xrd.aliases.push(node_text(child).unwrap_or_default()),
            XrdElement::Property => read_property(child, &mut xrd.properties),
            XrdElement::Link => xrd.links.push(read_link(child)),
            XrdElement::Title | XrdElement::Unknown => {
                debug!(
                    element = child.tag_name().name(),
                    "skipping unrecognized XRD element"
                );
            }
        }
    }

    ensure_valid(&xrd)?;
    debug!(
        path = %path.display(),
        aliases = xrd.aliases.len(),
        properties = xrd.properties.len(),
        links = xrd.links.len(),
        "parsed XRD document"
    );
    Ok(xrd)
}

/// Collects root namespace declarations, then root attributes.
///
/// `xml:id`, the default XRD namespace and the XSI declaration are left out:
/// the writer derives those itself.
fn root_attributes(root: Node<'_, '_>) -> indexmap::IndexMap<String, String> {
    let mut attributes = indexmap::IndexMap::new();

    for namespace in root.namespaces() {
        match namespace.name() {
            None if namespace.uri() == XRD_NAMESPACE => {}
            None => {
                attributes.insert("xmlns".to_string(), namespace.uri().to_string());
            }
            Some("xml") => {}
            Some("xsi") if namespace.uri() == XSI_NAMESPACE => {}
            Some(prefix) => {
                attributes.insert(format!("xmlns:{prefix}"), namespace.uri().to_string());
            }
        }
    }

    for attribute in root.attributes() {
        let key = match attribute.namespace() {
            Some(XML_NAMESPACE) if attribute.name() == "id" => continue,
            Some(uri) => match root.lookup_prefix(uri) {
                Some(prefix) => format!("{prefix}:{}", attribute.name()),
                None => attribute.name().to_string(),
            },
            None => attribute.name().to_string(),
        };
        attributes.insert(key, attribute.value().to_string());
    }

    attributes
}

fn read_link(node: Node<'_, '_>) -> Link {
    let mut link = Link {
        rel: non_empty_attribute(node, "rel"),
        media_type: non_empty_attribute(node, "type"),
        href: non_empty_attribute(node, "href"),
        template: non_empty_attribute(node, "template"),
        ..Default::default()
    };

    for child in node.children().filter(Node::is_element) {
        match XrdElement::classify(child) {
            XrdElement::Title => link.titles.push(Title {
                value: node_text(child).unwrap_or_default(),
                lang: child
                    .attribute((XML_NAMESPACE, "lang"))
                    .unwrap_or_default()
                    .to_string(),
            }),
            XrdElement::Property => read_property(child, &mut link.properties),
            _ => {
                debug!(
                    element = child.tag_name().name(),
                    "skipping unrecognized element inside <Link>"
                );
            }
        }
    }

    link
}

/// Adds one `<Property>` to `properties`.
///
/// No text means nil; the `xsi:nil` marker is advisory only.
fn read_property(node: Node<'_, '_>, properties: &mut Properties) {
    let type_uri = node.attribute("type").unwrap_or_default();
    let value = node_text(node);

    if value.is_some() && node.attribute((XSI_NAMESPACE, "nil")).is_some() {
        debug!(
            property = type_uri,
            "property has text and an xsi:nil marker; keeping the text"
        );
    }

    properties.append(type_uri, value);
}

fn non_empty_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Concatenates every descendant text node in document order and trims it.
///
/// Returns `None` when there is no text at all.
pub(crate) fn node_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(Node::is_text)
        .filter_map(|text| text.text())
        .collect();

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn build_xrd_xml(xrd: &Xrd) -> Result<String, XrdError> {
    ensure_valid(xrd)?;

    // Nil markers and stored `xsi:` attributes both need the prefix bound.
    let declare_xsi = xrd.has_nil_property()
        || xrd.attributes.keys().any(|name| name.starts_with("xsi:"));

    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    write!(xml, "<XRD xmlns=\"{XRD_NAMESPACE}\"")?;
    if let Some(id) = &xrd.document_id {
        write!(xml, " xml:id=\"{}\"", xml_escape(id))?;
    }
    if declare_xsi {
        write!(xml, " xmlns:xsi=\"{XSI_NAMESPACE}\"")?;
    }
    for (name, value) in &xrd.attributes {
        let already_written = name == "xmlns"
            || name == "xml:id"
            || (declare_xsi && name == "xmlns:xsi");
        if already_written {
            continue;
        }
        write!(xml, " {}=\"{}\"", name, xml_escape(value))?;
    }

    let is_empty = xrd.expires.is_none()
        && xrd.subject.is_none()
        && xrd.aliases.is_empty()
        && xrd.properties.is_empty()
        && xrd.links.is_empty();
    if is_empty {
        writeln!(xml, "/>")?;
        return Ok(xml);
    }
    writeln!(xml, ">")?;

    if let Some(expires) = &xrd.expires {
        writeln!(xml, "  <Expires>{}</Expires>", format_expires(expires))?;
    }
    if let Some(subject) = &xrd.subject {
        writeln!(xml, "  <Subject>{}</Subject>", xml_escape(subject))?;
    }
    for alias in &xrd.aliases {
        writeln!(xml, "  <Alias>{}</Alias>", xml_escape(alias))?;
    }
    write_properties(&mut xml, &xrd.properties, "  ")?;
    for link in &xrd.links {
        write_link(&mut xml, link)?;
    }

    writeln!(xml, "</XRD>")?;
    debug!(links = xrd.links.len(), bytes = xml.len(), "rendered XRD document");
    Ok(xml)
}

fn write_link(xml: &mut String, link: &Link) -> Result<(), XrdError> {
    write!(xml, "  <Link")?;
    let attributes = [
        ("rel", &link.rel),
        ("type", &link.media_type),
        ("href", &link.href),
        ("template", &link.template),
    ];
    for (name, value) in attributes {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            write!(xml, " {}=\"{}\"", name, xml_escape(value))?;
        }
    }

    if link.titles.is_empty() && link.properties.is_empty() {
        writeln!(xml, "/>")?;
        return Ok(());
    }
    writeln!(xml, ">")?;

    for title in &link.titles {
        if title.is_default() {
            writeln!(xml, "    <Title>{}</Title>", xml_escape(&title.value))?;
        } else {
            writeln!(
                xml,
                "    <Title xml:lang=\"{}\">{}</Title>",
                xml_escape(&title.lang),
                xml_escape(&title.value)
            )?;
        }
    }
    write_properties(xml, &link.properties, "    ")?;

    writeln!(xml, "  </Link>")?;
    Ok(())
}

/// One `<Property>` element per stored value, multi-valued entries included.
fn write_properties(
    xml: &mut String,
    properties: &Properties,
    indent: &str,
) -> Result<(), XrdError> {
    for (type_uri, value) in properties.iter() {
        for item in value.iter() {
            match item {
                Some(text) if !is_nil(Some(text)) => writeln!(
                    xml,
                    "{indent}<Property type=\"{}\">{}</Property>",
                    xml_escape(type_uri),
                    xml_escape(text)
                )?,
                _ => writeln!(
                    xml,
                    "{indent}<Property type=\"{}\" xsi:nil=\"true\"/>",
                    xml_escape(type_uri)
                )?,
            }
        }
    }
    Ok(())
}

/// Whitespace controls are written as character references so attribute
/// value normalization on read leaves them intact.
fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

//! Conversion module for format transformation reporting.
//!
//! XRD and JRD do not carry exactly the same information. This module works
//! out, before anything is written, what a conversion will keep, collapse or
//! drop, so the CLI can refuse lossy conversions unless asked.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::collections::HashSet;
use std::path::Path;

use crate::ir::{Link, Properties, Xrd};

/// Wire format identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// XRD 1.0 XML.
    Xrd,
    /// JRD JSON.
    Jrd,
}

impl Format {
    /// Human-readable name for the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Xrd => "xrd",
            Format::Jrd => "jrd",
        }
    }

    /// Guesses the format from a file extension, then from the content.
    ///
    /// `.xrd`/`.xml` mean XRD and `.jrd`/`.json` mean JRD. Otherwise the
    /// first non-whitespace byte decides: `<` is XRD, `{` is JRD.
    pub fn detect(path: Option<&Path>, content: &[u8]) -> Option<Format> {
        let by_extension = path
            .and_then(|path| path.extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "xrd" | "xml" => Some(Format::Xrd),
                "jrd" | "json" => Some(Format::Jrd),
                _ => None,
            });

        by_extension.or_else(|| {
            match content.iter().find(|byte| !byte.is_ascii_whitespace()) {
                Some(b'<') => Some(Format::Xrd),
                Some(b'{') => Some(Format::Jrd),
                _ => None,
            }
        })
    }
}

/// Build a conversion report analyzing what will happen during conversion.
pub fn build_conversion_report(xrd: &Xrd, from: Format, to: Format) -> ConversionReport {
    let mut report = ConversionReport::new(from.name(), to.name());

    report.input = count(xrd);
    report.output = report.input.clone();
    // Valueless properties have nothing to write in either format.
    report.output.properties = all_properties(xrd)
        .flat_map(|properties| properties.iter())
        .filter(|(_, value)| !value.is_empty())
        .count();

    match to {
        Format::Jrd => analyze_to_jrd(xrd, &mut report),
        Format::Xrd => analyze_to_xrd(xrd, &mut report),
    }

    report
}

fn analyze_to_jrd(xrd: &Xrd, report: &mut ConversionReport) {
    if xrd.document_id.is_some() {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropDocumentId,
            "document id (xml:id) will be dropped",
        ));
    }

    if !xrd.attributes.is_empty() {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropAttributes,
            format!(
                "{} root attribute(s) will be dropped",
                xrd.attributes.len()
            ),
        ));
    }

    let multi_valued = all_properties(xrd)
        .flat_map(|properties| properties.iter())
        .filter(|(_, value)| value.is_multiple())
        .count();
    if multi_valued > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::CollapseMultiValuedProperties,
            format!(
                "{} multi-valued property(s) will keep only their last value",
                multi_valued
            ),
        ));
    }

    let distinct_titles: usize = xrd.links.iter().map(distinct_title_langs).sum();
    if distinct_titles < report.input.titles {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::CollapseDuplicateTitleLangs,
            format!(
                "{} title(s) share a language with a later title and will be dropped",
                report.input.titles - distinct_titles
            ),
        ));
    }

    if xrd
        .links
        .iter()
        .flat_map(|link| &link.titles)
        .any(|title| title.is_default())
    {
        report.add(ConversionIssue::info(
            ConversionIssueCode::JrdDefaultTitleKey,
            "titles without a language are keyed as \"default\"",
        ));
    }

    report.output.titles = distinct_titles;
    report.output.property_values = report.output.properties;
}

fn analyze_to_xrd(xrd: &Xrd, report: &mut ConversionReport) {
    let empty_values = all_properties(xrd)
        .flat_map(|properties| properties.iter())
        .flat_map(|(_, value)| value.iter())
        .filter(|value| *value == Some(""))
        .count();
    if empty_values > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::EmptyValuesRenderedAsNil,
            format!(
                "{} empty property value(s) will be written as nil",
                empty_values
            ),
        ));
    }

    if xrd.has_nil_property() {
        report.add(ConversionIssue::info(
            ConversionIssueCode::XrdNilNamespace,
            "the xsi namespace is declared on the root for nil properties",
        ));
    }
}

fn count(xrd: &Xrd) -> ConversionCounts {
    ConversionCounts {
        aliases: xrd.aliases.len(),
        properties: all_properties(xrd).map(Properties::len).sum(),
        property_values: all_properties(xrd)
            .flat_map(|properties| properties.iter())
            .map(|(_, value)| value.len())
            .sum(),
        links: xrd.links.len(),
        titles: xrd.links.iter().map(|link| link.titles.len()).sum(),
    }
}

fn all_properties(xrd: &Xrd) -> impl Iterator<Item = &Properties> {
    std::iter::once(&xrd.properties).chain(xrd.links.iter().map(|link| &link.properties))
}

fn distinct_title_langs(link: &Link) -> usize {
    link.titles
        .iter()
        .map(|title| title.lang.as_str())
        .collect::<HashSet<_>>()
        .len()
}

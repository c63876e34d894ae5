//! Document validation for xrd.
//!
//! Both codecs run [`ensure_valid`] before they hand back a parsed document
//! or produce any output. Only errors are fatal; warnings flag content that
//! one of the wire formats cannot carry faithfully.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashSet;

use crate::error::XrdError;
use crate::ir::{Link, Properties, Xrd};

/// Validates a document and returns a report of all issues found.
///
/// - Error: a link sets both `href` and `template`
/// - Warning: a property has an empty type URI
/// - Warning: a multi-valued property is empty
/// - Warning: a link repeats a title language
pub fn validate_xrd(xrd: &Xrd) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_properties(&xrd.properties, &IssueContext::Document, &mut report);

    for (index, link) in xrd.links.iter().enumerate() {
        validate_link(index, link, &mut report);
    }

    report
}

/// Fails with [`XrdError::ValidationFailed`] if the document has any errors.
pub fn ensure_valid(xrd: &Xrd) -> Result<(), XrdError> {
    let report = validate_xrd(xrd);
    match report.first_error() {
        None => Ok(()),
        Some(first) => Err(XrdError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            summary: format!("{}: {}", first.context, first.message),
            report,
        }),
    }
}

fn validate_link(index: usize, link: &Link, report: &mut ValidationReport) {
    let context = IssueContext::Link {
        index,
        rel: link.rel.clone(),
    };

    if link.has_target_conflict() {
        report.add(ValidationIssue::error(
            IssueCode::HrefTemplateConflict,
            "only one of href or template may be specified",
            context.clone(),
        ));
    }

    let mut seen_langs = HashSet::new();
    for title in &link.titles {
        if !seen_langs.insert(title.lang.as_str()) {
            let lang = if title.is_default() {
                "default"
            } else {
                title.lang.as_str()
            };
            report.add(ValidationIssue::warning(
                IssueCode::DuplicateTitleLang,
                format!("more than one title for language '{lang}'"),
                context.clone(),
            ));
        }
    }

    validate_properties(&link.properties, &context, report);
}

fn validate_properties(
    properties: &Properties,
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    for (type_uri, value) in properties.iter() {
        if type_uri.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyPropertyType,
                "property has an empty type",
                context.clone(),
            ));
        }

        if value.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyPropertySequence,
                format!("property '{type_uri}' has no values"),
                context.clone(),
            ));
        }
    }
}

//! Conversion report types for tracking lossiness and policy decisions.
//!
//! This module provides structured reporting for format conversions,
//! similar to how `validation::ValidationReport` tracks document issues.

use serde::Serialize;
use std::fmt;

/// A report generated during format conversion.
///
/// Tracks input/output counts, lossiness warnings, and policy decisions
/// so callers can see exactly what a conversion kept and what it dropped.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Source format name.
    pub from: String,
    /// Target format name.
    pub to: String,
    /// Counts from the input document.
    pub input: ConversionCounts,
    /// Counts in the output (titles and property values may collapse).
    pub output: ConversionCounts,
    /// Issues discovered during conversion analysis.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for a conversion between formats.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues (true lossiness).
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Returns true if this conversion would lose information.
    pub fn is_lossy(&self) -> bool {
        self.warning_count() > 0
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converting {} -> {}", self.from, self.to)?;
        writeln!(
            f,
            "  {} aliases, {} properties ({} values), {} links, {} titles",
            self.input.aliases,
            self.input.properties,
            self.input.property_values,
            self.input.links,
            self.input.titles
        )?;

        if self.output != self.input {
            writeln!(
                f,
                "  output: {} aliases, {} properties ({} values), {} links, {} titles",
                self.output.aliases,
                self.output.properties,
                self.output.property_values,
                self.output.links,
                self.output.titles
            )?;
        }

        for (severity, heading) in [
            (ConversionSeverity::Warning, "Warnings"),
            (ConversionSeverity::Info, "Notes"),
        ] {
            let messages: Vec<&str> = self
                .issues
                .iter()
                .filter(|i| i.severity == severity)
                .map(|i| i.message.as_str())
                .collect();
            if messages.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} ({}):", heading, messages.len())?;
            for message in messages {
                writeln!(f, "  - {}", message)?;
            }
        }

        Ok(())
    }
}

/// Counts of document elements. Property values count every value of a
/// multi-valued property, root and link properties together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub aliases: usize,
    pub properties: usize,
    pub property_values: usize,
    pub links: usize,
    pub titles: usize,
}

/// A single issue discovered during conversion analysis.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    /// Create a warning-level issue (indicates lossiness).
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Create an info-level issue (policy note, does not block).
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Information loss; the CLI requires `--allow-lossy`.
    Warning,
    /// A policy note; never blocks conversion.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report schema and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    // -> JRD lossiness
    /// JRD has no document id.
    DropDocumentId,
    /// JRD has no root attributes or namespace declarations.
    DropAttributes,
    /// Multi-valued properties keep only their last value.
    CollapseMultiValuedProperties,
    /// Titles sharing a language keep only the last one.
    CollapseDuplicateTitleLangs,

    // -> XRD lossiness
    /// Empty-string property values have no XML text and come back as nil.
    EmptyValuesRenderedAsNil,

    // Policy decisions (Info level)
    /// Default-language titles are keyed `"default"` in JRD.
    JrdDefaultTitleKey,
    /// The XSI namespace is declared on the root because nil values exist.
    XrdNilNamespace,
}

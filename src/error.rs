use std::path::PathBuf;
use thiserror::Error;

use crate::conversion::ConversionReport;
use crate::validation::ValidationReport;

/// The main error type for xrd operations.
#[derive(Debug, Error)]
pub enum XrdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse XRD XML from {path}: {message}")]
    XrdXmlParse { path: PathBuf, message: String },

    #[error("Failed to write XRD XML: {0}")]
    XrdXmlWrite(#[from] std::fmt::Error),

    #[error("Failed to parse JRD JSON from {path}: {source}")]
    JrdJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JRD JSON: {source}")]
    JrdJsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid expires timestamp '{value}': {source}")]
    InvalidExpires {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s): {summary}")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        summary: String,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Conversion from {from} to {to} would lose information (use --allow-lossy to proceed)")]
    LossyConversion {
        from: String,
        to: String,
        report: Box<ConversionReport>,
    },

    #[error("No link found with rel {0}")]
    LinkNotFound(String),
}

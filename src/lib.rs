//! xrd: Extensible Resource Descriptor reader, writer and converter.
//!
//! XRD documents describe a resource through its subject, aliases,
//! properties and links. They travel either as XML (XRD 1.0) or as JSON
//! (JRD, RFC 6415). This crate parses both into one model and renders the
//! model back out in either format, so XRD → JRD and JRD → XRD are both a
//! parse followed by a render.
//!
//! # Modules
//!
//! - [`ir`]: Document model (`Xrd`, `Link`, `Title`, properties) and the
//!   format readers/writers
//! - [`validation`]: Structural checks run by every reader and writer
//! - [`conversion`]: Lossiness reporting for cross-format conversion
//! - [`error`]: Error types for xrd operations
//!
//! # Example
//!
//! ```
//! let xml = r#"<?xml version="1.0"?>
//! <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
//!   <Subject>acct:someone@example.com</Subject>
//!   <Link rel="http://webfinger.net/rel/profile-page" href="https://example.com/someone"/>
//! </XRD>"#;
//!
//! let xrd = xrd::parse_xml(xml).unwrap();
//! let json = xrd::ir::io_jrd_json::to_jrd_string_compact(&xrd).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"subject":"acct:someone@example.com","links":[{"rel":"http://webfinger.net/rel/profile-page","href":"https://example.com/someone"}]}"#
//! );
//! ```

pub mod conversion;
pub mod error;
pub mod ir;
pub mod validation;

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use conversion::Format;
pub use error::XrdError;
pub use ir::io_jrd_json::{from_jrd_str as parse_json, to_jrd_string as render_json};
pub use ir::io_xrd_xml::{from_xrd_str as parse_xml, to_xrd_string as render_xml};
pub use ir::{Link, Properties, PropertyValue, Title, Xrd};

/// The xrd CLI application.
#[derive(Parser)]
#[command(name = "xrd")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a document between XRD and JRD.
    Convert(ConvertArgs),
    /// Validate a document and report issues.
    Validate(ValidateArgs),
    /// Find the first link with a given relation type.
    Find(FindArgs),
}

/// Input format selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Detect from the file extension, then from the content.
    Auto,
    Xrd,
    Jrd,
}

/// Output format selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xrd,
    Jrd,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xrd => Format::Xrd,
            OutputFormat::Jrd => Format::Jrd,
        }
    }
}

/// How reports are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input document.
    input: PathBuf,

    /// Input format.
    #[arg(long, value_enum, default_value = "auto")]
    from: InputFormat,

    /// Output format.
    #[arg(long, value_enum)]
    to: OutputFormat,

    /// Output file (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write single-line JRD instead of pretty-printed JSON.
    #[arg(long, env = "XRD_COMPACT")]
    compact: bool,

    /// Proceed even if the target format cannot hold everything.
    #[arg(long, env = "XRD_ALLOW_LOSSY")]
    allow_lossy: bool,

    /// Format of the conversion report printed to stderr.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input document to validate.
    input: PathBuf,

    /// Input format.
    #[arg(long, value_enum, default_value = "auto")]
    format: InputFormat,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the find subcommand.
#[derive(clap::Args)]
struct FindArgs {
    /// Input document.
    input: PathBuf,

    /// Relation type to look for; repeat to accept any of several.
    #[arg(long = "rel", required = true)]
    rels: Vec<String>,

    /// Print only this attribute of the link (rel, type, href, template).
    #[arg(long)]
    attr: Option<String>,

    /// Input format.
    #[arg(long, value_enum, default_value = "auto")]
    format: InputFormat,
}

/// Run the xrd CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), XrdError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Find(args)) => run_find(args),
        None => {
            println!("xrd {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Extensible Resource Descriptor (XRD/JRD) converter.");
            println!();
            println!("Run 'xrd --help' for usage information.");
            Ok(())
        }
    }
}

/// Reads `path` and resolves the input format.
fn load_input(path: &Path, format: InputFormat) -> Result<(Vec<u8>, Format), XrdError> {
    let content = fs::read(path).map_err(XrdError::Io)?;
    let format = match format {
        InputFormat::Xrd => Format::Xrd,
        InputFormat::Jrd => Format::Jrd,
        InputFormat::Auto => Format::detect(Some(path), &content).ok_or_else(|| {
            XrdError::UnsupportedFormat(format!(
                "cannot detect format of '{}' (pass --from/--format xrd or jrd)",
                path.display()
            ))
        })?,
    };
    debug!(path = %path.display(), format = format.name(), "loaded input");
    Ok((content, format))
}

fn parse_input(content: &[u8], format: Format) -> Result<Xrd, XrdError> {
    match format {
        Format::Xrd => ir::io_xrd_xml::from_xrd_slice(content),
        Format::Jrd => ir::io_jrd_json::from_jrd_slice(content),
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), XrdError> {
    let (content, from) = load_input(&args.input, args.from)?;
    let xrd = parse_input(&content, from)?;
    let to = Format::from(args.to);

    let report = conversion::build_conversion_report(&xrd, from, to);
    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|source| XrdError::JrdJsonWrite { source })?;
            eprintln!("{json}");
        }
        ReportFormat::Text => eprint!("{report}"),
    }

    if report.is_lossy() && !args.allow_lossy {
        return Err(XrdError::LossyConversion {
            from: from.name().to_string(),
            to: to.name().to_string(),
            report: Box::new(report),
        });
    }

    let rendered = match (to, args.compact) {
        (Format::Xrd, _) => ir::io_xrd_xml::to_xrd_string(&xrd)?,
        (Format::Jrd, false) => ir::io_jrd_json::to_jrd_string(&xrd)?,
        (Format::Jrd, true) => ir::io_jrd_json::to_jrd_string_compact(&xrd)?,
    };

    match args.output {
        Some(path) => fs::write(&path, rendered).map_err(XrdError::Io)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

/// JSON shape of `xrd validate --output json`.
#[derive(Serialize)]
struct ValidateSummary<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), XrdError> {
    let (content, format) = load_input(&args.input, args.format)?;

    // Readers validate before returning; a failed check still carries the
    // full report, which is what this command prints.
    let report = match parse_input(&content, format) {
        Ok(xrd) => validation::validate_xrd(&xrd),
        Err(XrdError::ValidationFailed { report, .. }) => report,
        Err(other) => return Err(other),
    };

    match args.output {
        ReportFormat::Json => {
            let summary = ValidateSummary {
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                issues: &report.issues,
            };
            let text = serde_json::to_string_pretty(&summary)
                .map_err(|source| XrdError::JrdJsonWrite { source })?;
            println!("{text}");
        }
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        let summary = report
            .issues
            .first()
            .map(|issue| format!("{}: {}", issue.context, issue.message))
            .unwrap_or_default();
        Err(XrdError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            summary,
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the find subcommand.
fn run_find(args: FindArgs) -> Result<(), XrdError> {
    let (content, format) = load_input(&args.input, args.format)?;
    let xrd = parse_input(&content, format)?;

    let link = xrd
        .find_link(&args.rels)
        .ok_or_else(|| XrdError::LinkNotFound(args.rels.join(" or ")))?;

    match &args.attr {
        Some(attr) => match link.attr(attr) {
            Some(value) => println!("{value}"),
            None => {
                return Err(XrdError::LinkNotFound(format!(
                    "{} with attribute '{}'",
                    args.rels.join(" or "),
                    attr
                )))
            }
        },
        None => println!("{}", ir::io_jrd_json::link_to_jrd_string(link)?),
    }

    Ok(())
}

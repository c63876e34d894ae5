//! In-memory document model for XRD and JRD.
//!
//! Every format reader produces an [`Xrd`], and every writer consumes one.
//! Conversions go XRD → model → JRD (or the reverse), so each format needs
//! only a reader and a writer.
//!
//! # Example
//!
//! ```
//! use xrd::ir::{Link, PropertyValue, Title, Xrd};
//! use xrd::ir::io_jrd_json::to_jrd_string_compact;
//!
//! let xrd = Xrd::new()
//!     .with_subject("acct:someone@example.com")
//!     .with_property("http://spec.example.net/version", PropertyValue::Multiple(vec![
//!         Some("1.0".into()),
//!         Some("2.0".into()),
//!     ]))
//!     .with_link(
//!         Link::new("http://webfinger.net/rel/profile-page")
//!             .with_href("https://example.com/someone")
//!             .with_title(Title::with_lang("Profil", "de")),
//!     );
//!
//! let json = to_jrd_string_compact(&xrd).unwrap();
//! assert!(json.contains(r#""http://spec.example.net/version":"2.0""#));
//! ```

pub mod io_jrd_json;
pub mod io_xrd_xml;
mod model;
mod property;
mod query;
mod timestamp;

// Re-export core types for convenient access
pub use model::{Link, Title, Xrd};
pub use property::{Properties, PropertyValue};
pub use query::Relations;
pub use timestamp::{format_expires, parse_expires};

#[cfg(feature = "fuzzing")]
pub use timestamp::fuzz_expires_roundtrip;

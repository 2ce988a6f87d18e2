//! Diagnostics for parse and evaluation errors
//!
//! Produces both human-friendly error messages and machine-readable
//! diagnostics suitable for editor integration.

#![warn(missing_docs)]

pub mod builder;
pub mod diagnostic;
pub mod formatter;
pub mod location;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use formatter::{DiagnosticFormatter, Format};
pub use location::{Position, SourceLocation, Span};

//! Core diagnostic types

use super::location::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hint - subtle suggestion for improvement
    Hint,
    /// Information - provides helpful information
    #[default]
    Info,
    /// Warning - may indicate a problem but doesn't prevent evaluation
    Warning,
    /// Error - prevents successful parsing or evaluation
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// The query text does not match the grammar
    SyntaxError,
    /// Parentheses or function arguments nested past the configured limit
    NestingTooDeep,
    /// Construct that parses but cannot be evaluated
    Unsupported,
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: String,
        location: SourceLocation,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            location,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Get the diagnostic code as a string
    pub fn code_string(&self) -> &'static str {
        match self.code {
            DiagnosticCode::SyntaxError => "E001",
            DiagnosticCode::NestingTooDeep => "E002",
            DiagnosticCode::Unsupported => "E100",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::SyntaxError => write!(f, "syntax error"),
            DiagnosticCode::NestingTooDeep => write!(f, "nesting too deep"),
            DiagnosticCode::Unsupported => write!(f, "unsupported"),
        }
    }
}

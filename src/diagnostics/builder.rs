//! Builder pattern for constructing diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use super::location::{Position, SourceLocation, Span};

/// Builder for constructing diagnostics fluently
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    location: Option<SourceLocation>,
}

impl DiagnosticBuilder {
    fn new(severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            severity,
            code,
            message: String::new(),
            location: None,
        }
    }

    /// Create a new error diagnostic builder
    pub fn error(code: DiagnosticCode) -> Self {
        Self::new(Severity::Error, code)
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the location from a span
    pub fn with_span(mut self, span: Span) -> Self {
        let source_text = self.location.take().and_then(|l| l.source_text);
        self.location = Some(SourceLocation { span, source_text });
        self
    }

    /// Set the location from start and end positions
    pub fn with_positions(self, start: Position, end: Position) -> Self {
        self.with_span(Span::new(start, end))
    }

    /// Attach the source line the location points into
    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        let location = self.location.get_or_insert_with(SourceLocation::default);
        location.source_text = Some(text.into());
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        Diagnostic::new(
            self.severity,
            self.code,
            self.message,
            self.location.unwrap_or_default(),
        )
    }

    /// Create a syntax error diagnostic
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::error(DiagnosticCode::SyntaxError).with_message(message)
    }

    /// Create an unsupported-construct diagnostic
    pub fn unsupported(what: &str) -> Self {
        Self::error(DiagnosticCode::Unsupported).with_message(format!("{what} is not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_source_text_across_span() {
        let diagnostic = DiagnosticBuilder::syntax_error("expected ']'")
            .with_source_text("foo[1")
            .with_positions(Position::new(0, 5), Position::new(0, 5))
            .build();

        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "expected ']'");
        assert_eq!(diagnostic.location.span.start.column, 5);
        assert_eq!(diagnostic.location.source_text.as_deref(), Some("foo[1"));
    }

    #[test]
    fn test_unsupported_message() {
        let diagnostic = DiagnosticBuilder::unsupported("relation 'matches'").build();
        assert_eq!(diagnostic.code, DiagnosticCode::Unsupported);
        assert_eq!(diagnostic.message, "relation 'matches' is not supported");
    }
}

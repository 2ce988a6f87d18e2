//! Formatting diagnostics for different output formats

use super::diagnostic::Diagnostic;
#[cfg(feature = "terminal")]
use super::diagnostic::Severity;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

/// Formatter for diagnostics
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    #[cfg(feature = "terminal")]
    use_color: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            #[cfg(feature = "terminal")]
            use_color: true,
        }
    }

    /// Set whether to show error codes
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Set whether to use color (terminal feature only)
    #[cfg(feature = "terminal")]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
            Format::Json => serde_json::to_string_pretty(diagnostic).unwrap_or_default(),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Format multiple diagnostics
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        match self.format {
            Format::Text => diagnostics
                .iter()
                .map(|d| self.format_text(d))
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Json => serde_json::to_string_pretty(diagnostics).unwrap_or_default(),
            Format::Compact => diagnostics
                .iter()
                .map(|d| self.format_compact(d))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = String::new();

        #[cfg(feature = "terminal")]
        if self.use_color {
            use colored::Colorize;
            let severity_str = match diagnostic.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".blue().bold(),
                Severity::Hint => "hint".green().bold(),
            };
            result.push_str(&format!("{}: {}", severity_str, diagnostic.message.bold()));
        } else {
            result.push_str(&format!("{}: {}", diagnostic.severity, diagnostic.message));
        }

        #[cfg(not(feature = "terminal"))]
        result.push_str(&format!("{}: {}", diagnostic.severity, diagnostic.message));

        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }
        result.push('\n');
        result.push_str(&format!(" --> {}\n", diagnostic.location));

        if let Some(line) = &diagnostic.location.source_text {
            let span = diagnostic.location.span;
            let width = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column).max(1)
            } else {
                line.chars().count().saturating_sub(span.start.column).max(1)
            };
            result.push_str(&format!("{:4} | {}\n", span.start.line + 1, line));
            result.push_str("     | ");
            result.push_str(&" ".repeat(span.start.column));
            result.push_str(&self.underline(diagnostic, width));
            result.push('\n');
        }

        result
    }

    #[cfg(feature = "terminal")]
    fn underline(&self, diagnostic: &Diagnostic, width: usize) -> String {
        let underline = "^".repeat(width);
        if !self.use_color {
            return underline;
        }
        use colored::Colorize;
        match diagnostic.severity {
            Severity::Error => underline.red().to_string(),
            Severity::Warning => underline.yellow().to_string(),
            Severity::Info => underline.blue().to_string(),
            Severity::Hint => underline.green().to_string(),
        }
    }

    #[cfg(not(feature = "terminal"))]
    fn underline(&self, _diagnostic: &Diagnostic, width: usize) -> String {
        "^".repeat(width)
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };

        format!(
            "{}: {}: {}{}",
            diagnostic.location, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::builder::DiagnosticBuilder;
    use crate::diagnostics::location::Position;

    fn plain(format: Format) -> DiagnosticFormatter {
        let formatter = DiagnosticFormatter::new(format);
        #[cfg(feature = "terminal")]
        let formatter = formatter.with_color(false);
        formatter
    }

    #[test]
    fn test_text_format() {
        let diagnostic = DiagnosticBuilder::syntax_error("expected end of input")
            .with_positions(Position::new(0, 6), Position::new(0, 6))
            .with_source_text("inbox heading")
            .build();

        let output = plain(Format::Text).with_code(false).format(&diagnostic);

        assert!(output.contains("error: expected end of input"));
        assert!(output.contains(" --> 1:7"));
        assert!(output.contains("   1 | inbox heading"));
        assert!(output.contains("     |       ^\n"));
        assert!(!output.contains("E001"));
    }

    #[test]
    fn test_compact_format() {
        let diagnostic = DiagnosticBuilder::syntax_error("expected ')'")
            .with_positions(Position::new(2, 3), Position::new(2, 3))
            .build();

        let output = plain(Format::Compact).format(&diagnostic);
        assert_eq!(output, "3:4: error: [E001] expected ')'");
    }

    #[test]
    fn test_json_format() {
        let diagnostic = DiagnosticBuilder::syntax_error("expected digit").build();
        let output = plain(Format::Json).format(&diagnostic);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["severity"], "error");
        assert_eq!(value["code"], "SyntaxError");
        assert_eq!(value["message"], "expected digit");
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diagnostics = vec![
            DiagnosticBuilder::syntax_error("expected digit").build(),
            DiagnosticBuilder::unsupported("function 'count'").build(),
        ];

        let output = plain(Format::Compact).format_all(&diagnostics);
        assert_eq!(output.lines().count(), 2);
    }
}

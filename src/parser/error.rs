// Copyright 2024 BikePath Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parser error types

use super::cursor::Cursor;
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Position};
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Syntax error anchored at the cursor position where it was raised.
///
/// `Display` renders the message followed by the offending source line and a
/// caret under the failing column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\n(input):{line}:{column}: syntax error: {message}\n{line_text}\n{}^\n", " ".repeat(*.column))]
pub struct ParseError {
    /// What the parser expected
    pub message: String,
    /// Line number, starting at 1
    pub line: usize,
    /// Column, starting at 0, in characters
    pub column: usize,
    /// Byte offset into the input
    pub offset: usize,
    /// Text of the line the error is on
    pub line_text: String,
    /// Set for errors that must not be recovered from by backtracking
    pub(crate) fatal: bool,
}

impl ParseError {
    /// Create an error at the cursor's current position
    pub(crate) fn at(cursor: &Cursor<'_>, message: impl Into<String>) -> Self {
        let pos = cursor.position();
        Self {
            message: message.into(),
            line: pos.line,
            column: pos.column,
            offset: pos.offset,
            line_text: cursor.current_line_text().to_string(),
            fatal: false,
        }
    }

    /// Mark the error as unrecoverable
    pub(crate) fn into_fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Whether backtracking may not recover from this error
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = if self.fatal {
            DiagnosticCode::NestingTooDeep
        } else {
            DiagnosticCode::SyntaxError
        };
        let position = Position::new(self.line - 1, self.column);
        DiagnosticBuilder::error(code)
            .with_message(&self.message)
            .with_positions(position, position)
            .with_source_text(&self.line_text)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_points_at_column() {
        let mut cursor = Cursor::new("a b\nc d");
        for _ in 0..6 {
            cursor.next();
        }
        let error = ParseError::at(&cursor, "expected end of input");
        assert_eq!(error.line, 2);
        assert_eq!(error.column, 2);
        assert_eq!(
            error.to_string(),
            "\n(input):2:2: syntax error: expected end of input\nc d\n  ^\n"
        );
    }

    #[test]
    fn test_to_diagnostic() {
        let mut cursor = Cursor::new("(");
        cursor.next();
        let diagnostic = ParseError::at(&cursor, "expected ')'").to_diagnostic();
        assert_eq!(diagnostic.code, DiagnosticCode::SyntaxError);
        assert_eq!(diagnostic.message, "expected ')'");
        assert_eq!(diagnostic.location.span.start.line, 0);
        assert_eq!(diagnostic.location.span.start.column, 1);
        assert_eq!(diagnostic.location.source_text.as_deref(), Some("("));
    }
}

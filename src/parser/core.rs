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

//! Parser state and low-level operations.
//!
//! Every speculative parse follows the same discipline: take a [`Snapshot`],
//! run the production, and [`restore`](Parser::restore) on failure. Restoring
//! rewinds the cursor and truncates the token stream, so an abandoned
//! alternative never leaves tokens behind.

use super::cursor::{Cursor, CursorPosition};
use super::error::{ParseError, ParseResult};
use super::lexer::{RESERVED_OPERATORS, RESERVED_WORDS, is_ident_rest, is_space};
use super::token::{Token, TokenRecorder, TokenType};
use crate::ast::PathExpression;

/// Default nesting limit.
///
/// The whole expression takes one level, each parenthesized predicate one
/// more and each function argument two.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Nesting budget; each parenthesized predicate costs one level and each
    /// function argument two
    pub max_depth: u32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Captured parser state for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) pos: CursorPosition,
    pub(crate) token_count: usize,
}

/// Backtracking recursive-descent parser for path expressions.
///
/// A parser owns its cursor and token buffer and is meant for a single
/// input. [`parse`](Parser::parse) always starts from the beginning, so
/// calling it again yields the same result.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    pub(super) cursor: Cursor<'a>,
    tokens: TokenRecorder<'a>,
    options: ParserOptions,
    depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser over the complete input
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            tokens: TokenRecorder::new(),
            options: ParserOptions::default(),
            depth: 0,
        }
    }

    /// Replace the parser options
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// The input being parsed
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Parse the whole input into a path expression.
    ///
    /// Tokens emitted up to the point of success or failure remain
    /// available through [`tokens`](Parser::tokens).
    pub fn parse(&mut self) -> ParseResult<PathExpression> {
        self.cursor = Cursor::new(self.cursor.source());
        self.tokens.clear();
        self.depth = 0;

        let result = self.parse_path_expression();
        match &result {
            Ok(_) => log::debug!(
                "parsed {:?} into {} tokens",
                self.source(),
                self.tokens.len()
            ),
            Err(e) => log::debug!(
                "failed to parse {:?} at {}:{}: {}",
                self.source(),
                e.line,
                e.column,
                e.message
            ),
        }
        result
    }

    /// Tokens recorded by the last call to [`parse`](Parser::parse)
    pub fn tokens(&self) -> &[Token<'a>] {
        self.tokens.as_slice()
    }

    // --- backtracking ---------------------------------------------------

    #[inline]
    pub(super) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.cursor.position(),
            token_count: self.tokens.len(),
        }
    }

    #[inline]
    pub(super) fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.seek(snapshot.pos);
        self.tokens.truncate(snapshot.token_count);
    }

    /// Run `f`; on a recoverable failure restore and return `Ok(None)`.
    ///
    /// Fatal errors propagate untouched.
    pub(super) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Option<T>> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => {
                self.restore(snapshot);
                Ok(None)
            }
        }
    }

    /// Run `f`, substituting `default` (and consuming nothing) if it fails
    pub(super) fn optional_or<T>(
        &mut self,
        default: T,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        Ok(self.try_parse(f)?.unwrap_or(default))
    }

    /// Run `f` one nesting level deeper, failing fatally past the limit
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(self.error("expression nested too deeply").into_fatal());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // --- tokens ---------------------------------------------------------

    /// Record a token covering everything consumed since `start`
    pub(super) fn emit(&mut self, token_type: TokenType, start: Snapshot) {
        let range = start.pos.offset..self.cursor.offset();
        let value = self.cursor.slice(range.start, range.end);
        self.tokens.push(Token::new(token_type, range, value));
    }

    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(&self.cursor, message)
    }

    // --- lexical helpers ------------------------------------------------

    /// Consume `s` if the input starts with it
    pub(super) fn skip_prefix(&mut self, s: &str) -> bool {
        if !self.cursor.has_prefix(s) {
            return false;
        }
        for _ in s.chars() {
            self.cursor.next();
        }
        true
    }

    /// Consume a keyword that is not immediately followed by an identifier
    /// character, emitting a token for it. Consumes nothing on failure.
    pub(super) fn skip_word(&mut self, word: &str, token_type: TokenType) -> bool {
        let start = self.snapshot();
        if !self.skip_prefix(word) {
            return false;
        }
        if self.cursor.peek().is_some_and(is_ident_rest) {
            self.restore(start);
            return false;
        }
        self.emit(token_type, start);
        true
    }

    /// Consume a symbolic operator, emitting a token for it
    pub(super) fn skip_operator(&mut self, op: &str, token_type: TokenType) -> bool {
        let start = self.snapshot();
        if !self.skip_prefix(op) {
            return false;
        }
        self.emit(token_type, start);
        true
    }

    /// Whether a reserved word or relation operator starts here
    pub(super) fn at_keyword(&self) -> bool {
        let rest = self.cursor.remaining();
        RESERVED_OPERATORS.iter().any(|op| rest.starts_with(op))
            || RESERVED_WORDS.iter().any(|word| {
                rest.strip_prefix(word)
                    .is_some_and(|after| !after.chars().next().is_some_and(is_ident_rest))
            })
    }

    pub(super) fn skip_whitespace(&mut self) {
        while self.cursor.peek().is_some_and(is_space) {
            self.cursor.next();
        }
    }

    /// Consume whitespace and return it
    pub(super) fn parse_spaces(&mut self) -> &'a str {
        let start = self.cursor.offset();
        self.skip_whitespace();
        self.cursor.slice(start, self.cursor.offset())
    }

    pub(super) fn expect(&mut self, s: &str) -> ParseResult<()> {
        if self.skip_prefix(s) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{s}'")))
        }
    }

    pub(super) fn expect_eof(&self) -> ParseResult<()> {
        if self.cursor.is_eof() {
            Ok(())
        } else {
            Err(self.error("expected end of input"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_truncates_tokens() {
        let mut parser = Parser::new("union x");
        let start = parser.snapshot();
        assert!(parser.skip_word("union", TokenType::Set));
        assert_eq!(parser.tokens().len(), 1);
        parser.restore(start);
        assert!(parser.tokens().is_empty());
        assert_eq!(parser.cursor.offset(), 0);
    }

    #[test]
    fn test_skip_word_requires_word_boundary() {
        let mut parser = Parser::new("uniontown");
        assert!(!parser.skip_word("union", TokenType::Set));
        assert_eq!(parser.cursor.offset(), 0);
        assert!(parser.tokens().is_empty());

        let mut parser = Parser::new("union(");
        assert!(parser.skip_word("union", TokenType::Set));
        assert_eq!(parser.tokens()[0].value, "union");
    }

    #[test]
    fn test_try_parse_restores_on_failure() {
        let mut parser = Parser::new("abc");
        let result = parser.try_parse(|p| {
            p.skip_operator("a", TokenType::Relation);
            Err::<(), _>(p.error("nope"))
        });
        assert_eq!(result, Ok(None));
        assert_eq!(parser.cursor.offset(), 0);
        assert!(parser.tokens().is_empty());
    }

    #[test]
    fn test_try_parse_propagates_fatal_errors() {
        let mut parser = Parser::new("abc");
        let result = parser.try_parse(|p| {
            p.cursor.next();
            Err::<(), _>(p.error("too deep").into_fatal())
        });
        assert!(result.unwrap_err().is_fatal());
        assert_eq!(parser.cursor.offset(), 1);
    }

    #[test]
    fn test_optional_or_substitutes_default() {
        let mut parser = Parser::new("x");
        let value = parser
            .optional_or(7, |p| {
                p.cursor.next();
                Err(p.error("no"))
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(parser.cursor.offset(), 0);
    }

    #[test]
    fn test_nested_enforces_limit() {
        let mut parser = Parser::new("").with_max_depth(1);
        let ok = parser.nested(|_| Ok(()));
        assert!(ok.is_ok());
        let err = parser.nested(|p| p.nested(|_| Ok(()))).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.message, "expression nested too deeply");
    }

    #[test]
    fn test_at_keyword() {
        assert!(Parser::new("and x").at_keyword());
        assert!(Parser::new("heading").at_keyword());
        assert!(Parser::new("!=x").at_keyword());
        assert!(Parser::new("<").at_keyword());
        assert!(!Parser::new("android").at_keyword());
        assert!(!Parser::new("notes").at_keyword());
        assert!(!Parser::new("!").at_keyword());
        assert!(!Parser::new("").at_keyword());
    }

    #[test]
    fn test_parse_spaces_returns_consumed_whitespace() {
        let mut parser = Parser::new(" \t x");
        assert_eq!(parser.parse_spaces(), " \t ");
        assert_eq!(parser.parse_spaces(), "");
    }
}

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

//! Path expression parser
//!
//! A backtracking recursive-descent parser that turns query text into a
//! [`PathExpression`](crate::ast::PathExpression) and, as a side effect,
//! records a stream of highlighting [`Token`]s.

#![warn(missing_docs)]

mod core;
pub mod cursor;
pub mod error;
mod grammar;
pub mod lexer;
pub mod token;

pub use self::core::{DEFAULT_MAX_DEPTH, Parser, ParserOptions};
pub use cursor::{Cursor, CursorPosition};
pub use error::{ParseError, ParseResult};
pub use token::{Token, TokenType};

use crate::ast::PathExpression;

/// Parse a path expression with default options
pub fn parse(input: &str) -> ParseResult<PathExpression> {
    Parser::new(input).parse()
}

/// Parse a path expression and return the highlighting tokens along with the
/// result. Tokens are returned even when parsing fails.
pub fn parse_with_tokens(input: &str) -> (ParseResult<PathExpression>, Vec<Token<'_>>) {
    let mut parser = Parser::new(input);
    let result = parser.parse();
    (result, parser.tokens().to_vec())
}

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

//! Highlighting tokens recorded as a side effect of parsing

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Kind of a highlighting token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    /// Axis spellings and path separators
    Axis,
    /// Node type keyword (`heading`)
    Type,
    /// `@name`
    Attribute,
    /// Function name before `(`
    FunctionName,
    /// Relation keyword or operator
    Relation,
    /// `"..."`
    QuotedString,
    /// Bare word or symbol
    UnquotedString,
    /// `and`, `or`, `not`
    Boolean,
    /// `union`, `except`, `intersect`
    Set,
    /// `[i]`, `[s]`, ...
    Modifier,
    /// A whole resolved comparison predicate
    Comparison,
}

impl TokenType {
    /// Name used in serialized output and highlighter themes
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenType::Axis => "axis",
            TokenType::Type => "type",
            TokenType::Attribute => "attribute",
            TokenType::FunctionName => "function-name",
            TokenType::Relation => "relation",
            TokenType::QuotedString => "quoted-string",
            TokenType::UnquotedString => "unquoted-string",
            TokenType::Boolean => "boolean",
            TokenType::Set => "set",
            TokenType::Modifier => "modifier",
            TokenType::Comparison => "comparison",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-copy token: kind, byte range and the source text it covers.
///
/// Comparison tokens span their constituents, so tokens may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Byte range in the source
    pub range: Range<usize>,
    /// Source text covered by `range`
    pub value: &'a str,
}

impl<'a> Token<'a> {
    /// Create a token
    pub fn new(token_type: TokenType, range: Range<usize>, value: &'a str) -> Self {
        Self {
            token_type,
            range,
            value,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}..{:<4} {:<15} {:?}",
            self.range.start, self.range.end, self.token_type, self.value
        )
    }
}

/// Append-only token sequence; truncation on backtrack is the only removal
#[derive(Debug, Clone, Default)]
pub struct TokenRecorder<'a> {
    tokens: Vec<Token<'a>>,
}

impl<'a> TokenRecorder<'a> {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            tokens: Vec::with_capacity(16),
        }
    }

    /// Append a token
    #[inline]
    pub fn push(&mut self, token: Token<'a>) {
        self.tokens.push(token);
    }

    /// Number of recorded tokens
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether nothing has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drop every token recorded after the first `len`
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.tokens.truncate(len);
    }

    /// Remove all tokens
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Recorded tokens in emission order
    pub fn as_slice(&self) -> &[Token<'a>] {
        &self.tokens
    }
}

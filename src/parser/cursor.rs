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

//! Character cursor over the query text

/// Where a cursor stands: byte offset plus 1-based line and 0-based column.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorPosition {
    /// Byte offset into the source
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column, starting at 0
    pub column: usize,
}

impl CursorPosition {
    const START: CursorPosition = CursorPosition {
        offset: 0,
        line: 1,
        column: 0,
    };
}

/// Low-level character iterator with line/column tracking.
///
/// No operation fails; the end of input shows up as `None` from
/// [`peek`](Cursor::peek) and [`next`](Cursor::next).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    pos: CursorPosition,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: CursorPosition::START,
        }
    }

    /// The whole input
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current position
    #[inline]
    pub fn position(&self) -> CursorPosition {
        self.pos
    }

    /// Byte offset of the current position
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos.offset
    }

    /// Move back (or forward) to a previously observed position
    #[inline]
    pub fn seek(&mut self, pos: CursorPosition) {
        debug_assert!(self.source.is_char_boundary(pos.offset));
        self.pos = pos;
    }

    /// Look at the next character without consuming it
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consume one character
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 0;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    /// Check whether the remaining input starts with `s`, without consuming
    #[inline]
    pub fn has_prefix(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Whether all input has been consumed
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos.offset >= self.source.len()
    }

    /// Unconsumed input
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    /// Source text between two byte offsets
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    /// Full text of the line holding the current position, without its newline
    pub fn current_line_text(&self) -> &'a str {
        let offset = self.pos.offset;
        let start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let end = self.source[offset..]
            .find('\n')
            .map_or(self.source.len(), |i| offset + i);
        &self.source[start..end]
    }
}

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

//! Lexical character classes
//!
//! Identifier characters come from fixed range tables rather than Unicode
//! general categories, so the accepted set never shifts with the Unicode
//! version of the toolchain. Both tables are sorted and non-overlapping.

/// Ranges a character may start an identifier with
const IDENT_START: &[(char, char)] = &[
    (':', ':'),
    ('A', 'Z'),
    ('_', '_'),
    ('a', 'z'),
    ('\u{00C0}', '\u{00D6}'),
    ('\u{00D8}', '\u{00F6}'),
    ('\u{00F8}', '\u{02FF}'),
    ('\u{0370}', '\u{037D}'),
    ('\u{037F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
];

/// Ranges allowed after the first identifier character, on top of [`IDENT_START`]
const IDENT_REST_EXTRA: &[(char, char)] = &[
    ('-', '.'),
    ('0', '9'),
    ('\u{00B7}', '\u{00B7}'),
    ('\u{0300}', '\u{036F}'),
    ('\u{203F}', '\u{2040}'),
];

/// Single characters accepted as an unquoted string on their own
pub const SYMBOLS: &str = "0123456789~`!#$%^&*-+={}|\\;',.?";

/// Words an unquoted string may not be
pub const RESERVED_WORDS: &[&str] = &[
    "beginswith",
    "endswith",
    "contains",
    "matches",
    "heading",
    "union",
    "except",
    "intersect",
    "and",
    "or",
    "not",
];

/// Relation operators, which are reserved as well
pub const RESERVED_OPERATORS: &[&str] = &["=", "!=", "<=", ">=", "<", ">"];

fn in_ranges(table: &[(char, char)], c: char) -> bool {
    table
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                std::cmp::Ordering::Less
            } else if lo > c {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Check if a character can start an identifier
#[inline]
pub fn is_ident_start(c: char) -> bool {
    in_ranges(IDENT_START, c)
}

/// Check if a character can continue an identifier
#[inline]
pub fn is_ident_rest(c: char) -> bool {
    is_ident_start(c) || in_ranges(IDENT_REST_EXTRA, c)
}

/// Check if a character is a standalone unquoted-string symbol
#[inline]
pub fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(c)
}

/// Whitespace skipped between syntactic productions
#[inline]
pub fn is_space(c: char) -> bool {
    c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(table: &[(char, char)]) {
        for window in table.windows(2) {
            assert!(window[0].1 < window[1].0, "{:?} overlaps {:?}", window[0], window[1]);
        }
        for (lo, hi) in table {
            assert!(lo <= hi);
        }
    }

    #[test]
    fn test_tables_are_sorted() {
        assert_sorted(IDENT_START);
        assert_sorted(IDENT_REST_EXTRA);
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_ident_start('a'));
        assert!(is_ident_start('Z'));
        assert!(is_ident_start('_'));
        assert!(is_ident_start(':'));
        assert!(is_ident_start('é'));
        assert!(is_ident_start('日'));
        assert!(!is_ident_start('0'));
        assert!(!is_ident_start('-'));
        assert!(!is_ident_start('.'));
        assert!(!is_ident_start('\u{00D7}'));
        assert!(!is_ident_start('\u{00F7}'));
        assert!(!is_ident_start('\u{037E}'));
        assert!(!is_ident_start('\u{3000}'));

        assert!(is_ident_rest('a'));
        assert!(is_ident_rest('0'));
        assert!(is_ident_rest('-'));
        assert!(is_ident_rest('.'));
        assert!(is_ident_rest('\u{00B7}'));
        assert!(is_ident_rest('\u{0301}'));
        assert!(is_ident_rest('\u{2040}'));
        assert!(!is_ident_rest('/'));
        assert!(!is_ident_rest('@'));
        assert!(!is_ident_rest(' '));
        assert!(!is_ident_rest('('));
    }

    #[test]
    fn test_symbols() {
        assert!(is_symbol('7'));
        assert!(is_symbol('\\'));
        assert!(is_symbol('\''));
        assert!(!is_symbol('"'));
        assert!(!is_symbol('/'));
        assert!(!is_symbol('@'));
        assert!(!is_symbol('['));
        assert!(!is_symbol('('));
    }
}

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

//! Grammar productions.
//!
//! Each production is a method on [`Parser`]. Productions either succeed or
//! fail with a [`ParseError`](super::ParseError); callers that have
//! alternatives go through [`Parser::try_parse`], which restores the cursor
//! and token stream before the next alternative is tried.
//!
//! Binary operators (`union`, `except`, `intersect`, `or`, `and`) associate
//! to the right. Their operands are collected in a loop and folded from the
//! right, so a long chain does not deepen the call stack.

use super::core::Parser;
use super::error::ParseResult;
use super::lexer::{is_ident_rest, is_ident_start, is_symbol};
use super::token::TokenType;
use crate::ast::{
    Axis, Function, LocationExpression, Modifier, NodeType, Path, PathExpression, Predicate,
    Relation, Slice, Step, Value,
};

/// Axis spellings in match order; longer spellings shadow their prefixes
const AXIS_SPELLINGS: [(&str, Axis); 15] = [
    ("ancestor-or-self::", Axis::AncestorOrSelf),
    ("ancestor::", Axis::Ancestor),
    ("child::", Axis::Child),
    ("descendant-or-self::", Axis::DescendantOrSelf),
    ("descendant::", Axis::Descendant),
    ("following-sibling::", Axis::FollowingSibling),
    ("following::", Axis::Following),
    ("preceding-sibling::", Axis::PrecedingSibling),
    ("preceding::", Axis::Preceding),
    ("parent::", Axis::Parent),
    ("self::", Axis::SelfAxis),
    ("//", Axis::DescendantOrSelfShortcut),
    ("/", Axis::DescendantShortcut),
    ("..", Axis::ParentShortcut),
    (".", Axis::SelfShortcut),
];

const WORD_RELATIONS: [(&str, Relation); 4] = [
    ("beginswith", Relation::BeginsWith),
    ("endswith", Relation::EndsWith),
    ("contains", Relation::Contains),
    ("matches", Relation::Matches),
];

const OPERATOR_RELATIONS: [(&str, Relation); 6] = [
    ("=", Relation::Equal),
    ("!=", Relation::NotEqual),
    ("<=", Relation::LessThanOrEqual),
    (">=", Relation::GreaterThanOrEqual),
    ("<", Relation::LessThan),
    (">", Relation::GreaterThan),
];

type Production<'a, T> = fn(&mut Parser<'a>) -> ParseResult<T>;

impl<'a> Parser<'a> {
    // --- expressions ----------------------------------------------------

    /// `PathExpression = ws (function ws EOF | ItemLocationExpression ws EOF)`
    pub(super) fn parse_path_expression(&mut self) -> ParseResult<PathExpression> {
        let start = self.snapshot();
        self.skip_whitespace();
        if let Some(function) = self.try_parse(Self::parse_function)? {
            self.skip_whitespace();
            if self.cursor.is_eof() {
                return Ok(PathExpression::Function(function));
            }
        }
        self.restore(start);

        self.skip_whitespace();
        if let Some(location) = self.try_parse(Self::parse_item_location_expression)? {
            self.skip_whitespace();
            self.expect_eof()?;
            return Ok(PathExpression::Location(location));
        }
        self.restore(start);
        Err(self.error("expected location expression or function call"))
    }

    pub(super) fn parse_item_location_expression(&mut self) -> ParseResult<LocationExpression> {
        self.nested(|p| {
            p.skip_whitespace();
            p.parse_union_paths()
        })
    }

    fn parse_union_paths(&mut self) -> ParseResult<LocationExpression> {
        self.parse_right_chain(
            Self::parse_except_paths,
            |p| p.skip_word("union", TokenType::Set),
            LocationExpression::union,
        )
    }

    fn parse_except_paths(&mut self) -> ParseResult<LocationExpression> {
        self.parse_right_chain(
            Self::parse_intersect_paths,
            |p| p.skip_word("except", TokenType::Set),
            LocationExpression::except,
        )
    }

    fn parse_intersect_paths(&mut self) -> ParseResult<LocationExpression> {
        self.parse_right_chain(
            Self::parse_location_expression,
            |p| p.skip_word("intersect", TokenType::Set),
            LocationExpression::intersect,
        )
    }

    /// `operand (op operand)*`, whitespace allowed around each operator,
    /// grouped as `a op (b op c)`.
    fn parse_right_chain<T>(
        &mut self,
        operand: Production<'a, T>,
        operator: fn(&mut Self) -> bool,
        combine: fn(T, T) -> T,
    ) -> ParseResult<T> {
        self.skip_whitespace();
        let first = operand(self)?;
        let mut rest = Vec::new();
        loop {
            self.skip_whitespace();
            if !operator(self) {
                break;
            }
            self.skip_whitespace();
            rest.push(operand(self)?);
        }

        let Some(mut folded) = rest.pop() else {
            return Ok(first);
        };
        while let Some(left) = rest.pop() {
            folded = combine(left, folded);
        }
        Ok(combine(first, folded))
    }

    fn parse_location_expression(&mut self) -> ParseResult<LocationExpression> {
        self.skip_whitespace();
        Ok(LocationExpression::Path(self.parse_item_path()?))
    }

    // --- paths ----------------------------------------------------------

    fn parse_item_path(&mut self) -> ParseResult<Path> {
        let start = self.snapshot();
        let absolute = self.skip_prefix("/");
        if absolute {
            self.emit(TokenType::Axis, start);
        }

        let mut steps = Vec::new();
        steps.push(self.parse_path_step()?);
        loop {
            let separator = self.snapshot();
            if !self.skip_prefix("/") {
                break;
            }
            self.emit(TokenType::Axis, separator);
            steps.push(self.parse_path_step()?);
        }
        Ok(Path { absolute, steps })
    }

    fn parse_path_step(&mut self) -> ParseResult<Step> {
        let axis = self.optional_or(Axis::Child, Self::parse_axis)?;
        let (node_type, predicate) = self.parse_step_test()?;
        let slice = if self.cursor.has_prefix("[") {
            Some(self.parse_slice()?)
        } else {
            None
        };
        Ok(Step {
            axis,
            node_type,
            predicate,
            slice,
        })
    }

    fn parse_axis(&mut self) -> ParseResult<Axis> {
        let start = self.snapshot();
        for (spelling, axis) in AXIS_SPELLINGS {
            if self.skip_prefix(spelling) {
                self.emit(TokenType::Axis, start);
                return Ok(axis);
            }
        }
        Err(self.error("expected axis"))
    }

    /// `type predicates | type | predicates`
    fn parse_step_test(&mut self) -> ParseResult<(NodeType, Predicate)> {
        if let Some(test) = self.try_parse(|p| {
            let node_type = p.parse_step_type()?;
            let predicate = p.parse_or_predicates()?;
            Ok((node_type, predicate))
        })? {
            return Ok(test);
        }
        if let Some(node_type) = self.try_parse(Self::parse_step_type)? {
            return Ok((node_type, Predicate::Any));
        }
        if let Some(predicate) = self.try_parse(Self::parse_or_predicates)? {
            return Ok((NodeType::Any, predicate));
        }
        Err(self.error("expected step type or predicate"))
    }

    fn parse_step_type(&mut self) -> ParseResult<NodeType> {
        if self.skip_word("heading", TokenType::Type) {
            Ok(NodeType::Heading)
        } else {
            Err(self.error("expected step type"))
        }
    }

    // --- predicates -----------------------------------------------------

    fn parse_or_predicates(&mut self) -> ParseResult<Predicate> {
        self.parse_right_chain(
            Self::parse_and_predicates,
            |p| p.skip_word("or", TokenType::Boolean),
            Predicate::or,
        )
    }

    fn parse_and_predicates(&mut self) -> ParseResult<Predicate> {
        self.parse_right_chain(
            Self::parse_not_predicate,
            |p| p.skip_word("and", TokenType::Boolean),
            Predicate::and,
        )
    }

    /// Any number of `not` prefixes; pairs cancel out
    fn parse_not_predicate(&mut self) -> ParseResult<Predicate> {
        let mut negations = 0usize;
        loop {
            self.skip_whitespace();
            if !self.skip_word("not", TokenType::Boolean) {
                break;
            }
            negations += 1;
        }
        self.skip_whitespace();
        let predicate = self.parse_predicate_expression()?;
        Ok(if negations % 2 == 1 {
            Predicate::not(predicate)
        } else {
            predicate
        })
    }

    fn parse_predicate_expression(&mut self) -> ParseResult<Predicate> {
        self.skip_whitespace();
        if self.skip_prefix("(") {
            let predicate = self.nested(Self::parse_or_predicates)?;
            self.skip_whitespace();
            self.expect(")")?;
            return Ok(predicate);
        }
        self.parse_comparison_predicate()
    }

    /// `*`, `value rel value`, `value`, or `rel value`, tried in that order.
    ///
    /// A successful comparison emits a token spanning all of it.
    fn parse_comparison_predicate(&mut self) -> ParseResult<Predicate> {
        let before = self.snapshot();
        self.skip_whitespace();
        let start = self.snapshot();
        if self.skip_prefix("*") {
            self.emit(TokenType::Comparison, start);
            return Ok(Predicate::Any);
        }

        let alternatives: [Production<'a, Predicate>; 3] = [
            Self::parse_multi_value_comparison,
            Self::parse_single_value_comparison,
            Self::parse_relation_comparison,
        ];
        for alternative in alternatives {
            self.restore(before);
            self.skip_whitespace();
            let start = self.snapshot();
            if let Some(predicate) = self.try_parse(alternative)? {
                self.emit(TokenType::Comparison, start);
                return Ok(predicate);
            }
        }
        self.restore(before);
        Err(self.error("expected comparison predicate"))
    }

    fn parse_multi_value_comparison(&mut self) -> ParseResult<Predicate> {
        let left = self.parse_function_or_value()?;
        let relation = self.optional_or(Relation::Contains, |p| {
            p.skip_whitespace();
            p.parse_relation()
        })?;
        let modifier = self.optional_or(Modifier::CaseInsensitive, |p| {
            p.skip_whitespace();
            p.parse_modifier()
        })?;
        self.skip_whitespace();
        let right = self.parse_function_or_value()?;
        Ok(Predicate::comparison(
            left,
            Some(relation),
            modifier,
            Some(right),
        ))
    }

    /// A lone attribute tests for presence; any other lone value is a text search
    fn parse_single_value_comparison(&mut self) -> ParseResult<Predicate> {
        let value = self.parse_predicate_value()?;
        let modifier = self.optional_or(Modifier::CaseInsensitive, |p| {
            p.skip_whitespace();
            p.parse_modifier()
        })?;
        Ok(match value {
            Value::GetAttribute(_) => Predicate::presence(value, modifier),
            other => Predicate::text_contains(other, modifier),
        })
    }

    fn parse_relation_comparison(&mut self) -> ParseResult<Predicate> {
        let relation = self.optional_or(Relation::Contains, Self::parse_relation)?;
        self.skip_whitespace();
        let modifier = self.optional_or(Modifier::CaseInsensitive, Self::parse_modifier)?;
        self.skip_whitespace();
        let right = self.parse_function_or_value()?;
        Ok(Predicate::comparison(
            Value::text(),
            Some(relation),
            modifier,
            Some(right),
        ))
    }

    fn parse_relation(&mut self) -> ParseResult<Relation> {
        for (word, relation) in WORD_RELATIONS {
            if self.skip_word(word, TokenType::Relation) {
                return Ok(relation);
            }
        }
        for (op, relation) in OPERATOR_RELATIONS {
            if self.skip_operator(op, TokenType::Relation) {
                return Ok(relation);
            }
        }
        Err(self.error("expected relation"))
    }

    /// `[c]` where `c` is one of `s i n d l`
    fn parse_modifier(&mut self) -> ParseResult<Modifier> {
        let start = self.snapshot();
        self.expect("[")?;
        let Some(c) = self.cursor.peek() else {
            return Err(self.error("expected modifier, got EOF"));
        };
        let Some(modifier) = Modifier::from_char(c) else {
            return Err(self.error(format!("invalid modifier: {c}")));
        };
        self.cursor.next();
        self.expect("]")?;
        self.emit(TokenType::Modifier, start);
        Ok(modifier)
    }

    // --- values ---------------------------------------------------------

    fn parse_function_or_value(&mut self) -> ParseResult<Value> {
        if let Some(function) = self.try_parse(Self::parse_function)? {
            return Ok(Value::Function(function));
        }
        self.parse_predicate_value()
    }

    fn parse_predicate_value(&mut self) -> ParseResult<Value> {
        if let Some(attribute) = self.try_parse(Self::parse_attribute)? {
            return Ok(attribute);
        }
        self.parse_string_value()
    }

    fn parse_attribute(&mut self) -> ParseResult<Value> {
        let start = self.snapshot();
        self.expect("@")?;
        let name = self.parse_identifier()?;
        self.emit(TokenType::Attribute, start);
        Ok(Value::GetAttribute(name.to_string()))
    }

    /// `name(ItemLocationExpression)`
    fn parse_function(&mut self) -> ParseResult<Function> {
        let start = self.snapshot();
        let name = self.parse_identifier()?;
        self.emit(TokenType::FunctionName, start);
        self.expect("(")?;
        // An argument counts as two nesting levels
        let arg = self.nested(Self::parse_item_location_expression)?;
        self.expect(")")?;
        Ok(Function::new(name, arg))
    }

    /// One or more strings separated by whitespace, joined into one literal
    fn parse_string_value(&mut self) -> ParseResult<Value> {
        let mut literal = self.parse_string()?;
        while let Some((spaces, next)) = self.try_parse(|p| {
            let spaces = p.parse_spaces();
            let next = p.parse_string()?;
            Ok((spaces, next))
        })? {
            literal.push_str(spaces);
            literal.push_str(&next);
        }
        Ok(Value::Literal(literal.trim().to_string()))
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        if self.cursor.has_prefix("\"") {
            self.parse_quoted_string()
        } else {
            self.parse_unquoted_string()
        }
    }

    fn parse_quoted_string(&mut self) -> ParseResult<String> {
        let start = self.snapshot();
        self.expect("\"")?;
        let mut string = String::new();
        while let Some(c) = self.cursor.next() {
            match c {
                '"' => {
                    self.emit(TokenType::QuotedString, start);
                    return Ok(string);
                }
                '\\' => {
                    let Some(escaped) = self.cursor.next() else {
                        return Err(self.error("expected character after '\\'"));
                    };
                    string.push(match escaped {
                        '"' => '"',
                        '\\' => '\\',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => {
                            return Err(
                                self.error(format!("invalid escape sequence '\\{other}'"))
                            );
                        }
                    });
                }
                c => string.push(c),
            }
        }
        Err(self.error("expected '\"'"))
    }

    /// A single symbol character or an identifier that is not a keyword
    fn parse_unquoted_string(&mut self) -> ParseResult<String> {
        if self.at_keyword() {
            return Err(self.error("unexpected keyword"));
        }
        let start = self.snapshot();
        let string = match self.cursor.peek() {
            Some(c) if is_symbol(c) => {
                self.cursor.next();
                c.to_string()
            }
            _ => self.parse_identifier()?.to_string(),
        };
        self.emit(TokenType::UnquotedString, start);
        Ok(string)
    }

    fn parse_identifier(&mut self) -> ParseResult<&'a str> {
        let start = self.cursor.offset();
        match self.cursor.peek() {
            None => return Err(self.error("expected identifier, got EOF")),
            Some(c) if is_ident_start(c) => {
                self.cursor.next();
            }
            Some(_) => return Err(self.error("expected identifier")),
        }
        while self.cursor.peek().is_some_and(is_ident_rest) {
            self.cursor.next();
        }
        Ok(self.cursor.slice(start, self.cursor.offset()))
    }

    // --- slices ---------------------------------------------------------

    fn parse_slice(&mut self) -> ParseResult<Slice> {
        if let Some(slice) = self.try_parse(Self::parse_simple_slice)? {
            return Ok(slice);
        }
        self.parse_range_slice()
    }

    /// `[n]`
    fn parse_simple_slice(&mut self) -> ParseResult<Slice> {
        self.expect("[")?;
        let start = self.parse_integer()?;
        self.expect("]")?;
        Ok(Slice::index(start))
    }

    /// `[start?:end?]`
    fn parse_range_slice(&mut self) -> ParseResult<Slice> {
        self.expect("[")?;
        let start = self.try_parse(Self::parse_integer)?;
        self.expect(":")?;
        let end = self.try_parse(Self::parse_integer)?;
        self.expect("]")?;
        Ok(Slice::range(start, end))
    }

    fn parse_integer(&mut self) -> ParseResult<i64> {
        let start = self.cursor.offset();
        self.skip_prefix("-");
        if !self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(self.error("expected digit"));
        }
        while self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.next();
        }
        self.cursor
            .slice(start, self.cursor.offset())
            .parse()
            .map_err(|_| self.error("integer out of range"))
    }
}

//! Expression node types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of a parsed path expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathExpression {
    /// A bare function call applied to a location expression, e.g. `count(//@tag)`
    Function(Function),
    /// A set-algebra combination of paths
    Location(LocationExpression),
}

/// Binary tree over the path-set operators
///
/// Operators are right-associative: `a except b except c` is
/// `Except(a, Except(b, c))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationExpression {
    /// A single path
    Path(Path),
    /// `left union right`
    Union(Box<LocationExpression>, Box<LocationExpression>),
    /// `left except right`
    Except(Box<LocationExpression>, Box<LocationExpression>),
    /// `left intersect right`
    Intersect(Box<LocationExpression>, Box<LocationExpression>),
}

impl LocationExpression {
    /// Create a union node
    pub fn union(left: LocationExpression, right: LocationExpression) -> Self {
        Self::Union(Box::new(left), Box::new(right))
    }

    /// Create an except node
    pub fn except(left: LocationExpression, right: LocationExpression) -> Self {
        Self::Except(Box::new(left), Box::new(right))
    }

    /// Create an intersect node
    pub fn intersect(left: LocationExpression, right: LocationExpression) -> Self {
        Self::Intersect(Box::new(left), Box::new(right))
    }
}

impl From<Path> for LocationExpression {
    fn from(path: Path) -> Self {
        Self::Path(path)
    }
}

/// A sequence of location steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Whether the path began with a `/`
    pub absolute: bool,
    /// Steps in source order
    pub steps: Vec<Step>,
}

impl Path {
    /// Create a path from its steps
    pub fn new(absolute: bool, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            absolute,
            steps: steps.into_iter().collect(),
        }
    }
}

/// One location step: axis, node type test, predicate and optional slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Traversal direction
    pub axis: Axis,
    /// Node kind filter
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Row filter
    pub predicate: Predicate,
    /// Post-filter over the ordered matches
    pub slice: Option<Slice>,
}

impl Step {
    /// Create a step without a slice
    pub fn new(axis: Axis, node_type: NodeType, predicate: Predicate) -> Self {
        Self {
            axis,
            node_type,
            predicate,
            slice: None,
        }
    }

    /// Attach a slice to the step
    pub fn with_slice(mut self, slice: Slice) -> Self {
        self.slice = Some(slice);
        self
    }
}

/// Node kind filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Any item
    Any,
    /// Heading items only
    Heading,
}

/// Index or range post-filter, `[n]` or `[a:b]`
///
/// `[n]` and `[n:]` share their bounds and differ only in `range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Slice {
    /// Start index, may be negative
    pub start: Option<i64>,
    /// End index (exclusive), `None` for a single index or an open range
    pub end: Option<i64>,
    /// Whether this was written as a range with `:`
    pub range: bool,
}

impl Slice {
    /// Select a single index
    pub const fn index(index: i64) -> Self {
        Self {
            start: Some(index),
            end: None,
            range: false,
        }
    }

    /// Select a half-open range, either bound optional
    pub const fn range(start: Option<i64>, end: Option<i64>) -> Self {
        Self {
            start,
            end,
            range: true,
        }
    }
}

/// Tree traversal direction of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// `ancestor::`
    Ancestor,
    /// `ancestor-or-self::`
    AncestorOrSelf,
    /// `parent::`
    Parent,
    /// `..`
    ParentShortcut,
    /// `self::`
    #[serde(rename = "self")]
    SelfAxis,
    /// `.`
    SelfShortcut,
    /// `child::`, and the default when no axis is written
    Child,
    /// `descendant::`
    Descendant,
    /// `/` at the start of a step
    DescendantShortcut,
    /// `descendant-or-self::`
    DescendantOrSelf,
    /// `//` at the start of a step
    DescendantOrSelfShortcut,
    /// `following-sibling::`
    FollowingSibling,
    /// `following::`
    Following,
    /// `preceding-sibling::`
    PrecedingSibling,
    /// `preceding::`
    Preceding,
}

impl Axis {
    /// All axes, in declaration order
    pub const ALL: [Axis; 15] = [
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::Parent,
        Axis::ParentShortcut,
        Axis::SelfAxis,
        Axis::SelfShortcut,
        Axis::Child,
        Axis::Descendant,
        Axis::DescendantShortcut,
        Axis::DescendantOrSelf,
        Axis::DescendantOrSelfShortcut,
        Axis::FollowingSibling,
        Axis::Following,
        Axis::PrecedingSibling,
        Axis::Preceding,
    ];

    /// The axis that walks back the way this one came.
    ///
    /// Shortcut spellings map to their long-form counterpart.
    pub const fn inverse(self) -> Axis {
        match self {
            Axis::Ancestor => Axis::Descendant,
            Axis::AncestorOrSelf => Axis::DescendantOrSelf,
            Axis::Parent | Axis::ParentShortcut => Axis::Child,
            Axis::SelfAxis | Axis::SelfShortcut => Axis::SelfAxis,
            Axis::Child => Axis::Parent,
            Axis::Descendant | Axis::DescendantShortcut => Axis::Ancestor,
            Axis::DescendantOrSelf | Axis::DescendantOrSelfShortcut => Axis::AncestorOrSelf,
            Axis::FollowingSibling => Axis::PrecedingSibling,
            Axis::Following => Axis::Preceding,
            Axis::PrecedingSibling => Axis::FollowingSibling,
            Axis::Preceding => Axis::Following,
        }
    }

    /// The long-form axis a shortcut stands for
    pub const fn normalized(self) -> Axis {
        match self {
            Axis::ParentShortcut => Axis::Parent,
            Axis::SelfShortcut => Axis::SelfAxis,
            Axis::DescendantShortcut => Axis::Descendant,
            Axis::DescendantOrSelfShortcut => Axis::DescendantOrSelf,
            other => other,
        }
    }

    /// Source spelling of the axis
    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::Ancestor => "ancestor::",
            Axis::AncestorOrSelf => "ancestor-or-self::",
            Axis::Parent => "parent::",
            Axis::ParentShortcut => "..",
            Axis::SelfAxis => "self::",
            Axis::SelfShortcut => ".",
            Axis::Child => "child::",
            Axis::Descendant => "descendant::",
            Axis::DescendantShortcut => "/",
            Axis::DescendantOrSelf => "descendant-or-self::",
            Axis::DescendantOrSelfShortcut => "//",
            Axis::FollowingSibling => "following-sibling::",
            Axis::Following => "following::",
            Axis::PrecedingSibling => "preceding-sibling::",
            Axis::Preceding => "preceding::",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean row filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// `left relation [modifier] right`
    ///
    /// With `relation` and `right` both `None` this tests only for the
    /// presence of `left`, as in a bare `@done`.
    Comparison {
        /// Left operand
        left: Value,
        /// Relation, `None` for presence tests
        relation: Option<Relation>,
        /// Comparison modifier
        modifier: Modifier,
        /// Right operand, `None` for presence tests
        right: Option<Value>,
    },
    /// `left or right`
    Or(Box<Predicate>, Box<Predicate>),
    /// `left and right`
    And(Box<Predicate>, Box<Predicate>),
    /// `not predicate`
    Not(Box<Predicate>),
    /// `*`, or no predicate at all
    Any,
}

impl Predicate {
    /// Create a comparison
    pub fn comparison(
        left: Value,
        relation: Option<Relation>,
        modifier: Modifier,
        right: Option<Value>,
    ) -> Self {
        Self::Comparison {
            left,
            relation,
            modifier,
            right,
        }
    }

    /// Create a presence test for `left`
    pub fn presence(left: Value, modifier: Modifier) -> Self {
        Self::comparison(left, None, modifier, None)
    }

    /// `@text contains [modifier] value`, the expansion of a bare value
    pub fn text_contains(value: Value, modifier: Modifier) -> Self {
        Self::comparison(
            Value::text(),
            Some(Relation::Contains),
            modifier,
            Some(value),
        )
    }

    /// Create an or node
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Create an and node
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Create a not node
    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Self::Not(Box::new(predicate))
    }
}

/// Operand of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// A string literal
    Literal(String),
    /// `@name`
    GetAttribute(String),
    /// `name(location expression)`
    Function(Function),
}

impl Value {
    /// Create a literal value
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    /// Create an attribute reference
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::GetAttribute(name.into())
    }

    /// The implicit `@text` attribute
    pub fn text() -> Self {
        Self::GetAttribute(TEXT_ATTRIBUTE.to_string())
    }
}

/// Name of the attribute holding a row's text
pub const TEXT_ATTRIBUTE: &str = "text";

/// A named function applied to a location expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Argument
    pub arg: Box<LocationExpression>,
}

impl Function {
    /// Create a function node
    pub fn new(name: impl Into<String>, arg: LocationExpression) -> Self {
        Self {
            name: name.into(),
            arg: Box::new(arg),
        }
    }
}

/// Comparison relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// `beginswith`
    BeginsWith,
    /// `contains`, the relation of a bare value
    #[default]
    Contains,
    /// `endswith`
    EndsWith,
    /// `matches`
    Matches,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessThanOrEqual,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
}

impl Relation {
    /// Source spelling of the relation
    pub const fn as_str(self) -> &'static str {
        match self {
            Relation::BeginsWith => "beginswith",
            Relation::Contains => "contains",
            Relation::EndsWith => "endswith",
            Relation::Matches => "matches",
            Relation::Equal => "=",
            Relation::NotEqual => "!=",
            Relation::LessThanOrEqual => "<=",
            Relation::GreaterThanOrEqual => ">=",
            Relation::LessThan => "<",
            Relation::GreaterThan => ">",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison modifier, written `[s]`, `[i]`, `[n]`, `[d]` or `[l]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    /// `[s]`
    CaseSensitive,
    /// `[i]`, used when no modifier is written
    #[default]
    CaseInsensitive,
    /// `[n]`
    NumericCompare,
    /// `[d]`
    DateCompare,
    /// `[l]`
    ListCompare,
}

impl Modifier {
    /// Modifier for the letter inside the brackets
    pub const fn from_char(c: char) -> Option<Modifier> {
        match c {
            'i' => Some(Modifier::CaseInsensitive),
            's' => Some(Modifier::CaseSensitive),
            'n' => Some(Modifier::NumericCompare),
            'd' => Some(Modifier::DateCompare),
            'l' => Some(Modifier::ListCompare),
            _ => None,
        }
    }

    /// Letter used inside the brackets
    pub const fn as_char(self) -> char {
        match self {
            Modifier::CaseSensitive => 's',
            Modifier::CaseInsensitive => 'i',
            Modifier::NumericCompare => 'n',
            Modifier::DateCompare => 'd',
            Modifier::ListCompare => 'l',
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_char())
    }
}

//! Parser integration tests: syntax trees, token streams and errors

use bikepath::ast::{
    Axis, LocationExpression, Modifier, NodeType, Path, PathExpression, Predicate, Relation,
    Slice, Step, Value,
};
use bikepath::parser::{DEFAULT_MAX_DEPTH, Parser, TokenType, parse, parse_with_tokens};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn location(input: &str) -> LocationExpression {
    match parse(input) {
        Ok(PathExpression::Location(location)) => location,
        other => panic!("expected a location expression for {input:?}, got {other:?}"),
    }
}

fn path(input: &str) -> Path {
    match location(input) {
        LocationExpression::Path(path) => path,
        other => panic!("expected a single path for {input:?}, got {other:?}"),
    }
}

fn predicate(input: &str) -> Predicate {
    let path = path(input);
    assert_eq!(path.steps.len(), 1, "{input:?}");
    path.steps[0].predicate.clone()
}

fn text_contains(s: &str) -> Predicate {
    Predicate::text_contains(Value::literal(s), Modifier::CaseInsensitive)
}

fn token_layout(input: &str) -> Vec<(TokenType, std::ops::Range<usize>, String)> {
    let (_, tokens) = parse_with_tokens(input);
    tokens
        .into_iter()
        .map(|t| (t.token_type, t.range, t.value.to_string()))
        .collect()
}

#[test]
fn test_end_to_end_scenario() {
    let path = path("heading foo//@type = task and not @done[0]");
    assert!(!path.absolute);
    assert_eq!(path.steps.len(), 2);

    assert_eq!(
        path.steps[0],
        Step::new(Axis::Child, NodeType::Heading, text_contains("foo"))
    );
    assert_eq!(
        path.steps[1],
        Step::new(
            Axis::DescendantShortcut,
            NodeType::Any,
            Predicate::and(
                Predicate::comparison(
                    Value::attribute("type"),
                    Some(Relation::Equal),
                    Modifier::CaseInsensitive,
                    Some(Value::literal("task")),
                ),
                Predicate::not(Predicate::presence(
                    Value::attribute("done"),
                    Modifier::CaseInsensitive
                )),
            ),
        )
        .with_slice(Slice::index(0))
    );
}

#[test]
fn test_end_to_end_tokens() {
    assert_eq!(
        token_layout("heading foo//@type = task and not @done[0]"),
        vec![
            (TokenType::Type, 0..7, "heading".to_string()),
            (TokenType::UnquotedString, 8..11, "foo".to_string()),
            (TokenType::Comparison, 8..11, "foo".to_string()),
            (TokenType::Axis, 11..12, "/".to_string()),
            (TokenType::Axis, 12..13, "/".to_string()),
            (TokenType::Attribute, 13..18, "@type".to_string()),
            (TokenType::Relation, 19..20, "=".to_string()),
            (TokenType::UnquotedString, 21..25, "task".to_string()),
            (TokenType::Comparison, 13..25, "@type = task".to_string()),
            (TokenType::Boolean, 26..29, "and".to_string()),
            (TokenType::Boolean, 30..33, "not".to_string()),
            (TokenType::Attribute, 34..39, "@done".to_string()),
            (TokenType::Comparison, 34..39, "@done".to_string()),
        ]
    );
}

#[test]
fn test_backtracking_leaves_no_tokens_behind() {
    let mut parser = Parser::new("inbox heading");
    let error = parser.parse().unwrap_err();
    assert_eq!(error.message, "expected end of input");
    assert_eq!(error.column, 6);

    let tokens: Vec<_> = parser
        .tokens()
        .iter()
        .map(|t| (t.token_type, t.range.clone(), t.value))
        .collect();
    assert_eq!(
        tokens,
        vec![
            (TokenType::UnquotedString, 0..5, "inbox"),
            (TokenType::Comparison, 0..5, "inbox"),
        ]
    );
}

#[rstest]
#[case("heading foo//@type = task and not @done[0]")]
#[case("/a/b union //c except d intersect e")]
#[case("count(//heading)")]
#[case("inbox heading")]
#[case("(a or b) and not \"c d\" [s]")]
fn test_parse_is_deterministic(#[case] input: &str) {
    let mut parser = Parser::new(input);
    let first = parser.parse();
    let first_tokens = parser.tokens().to_vec();
    let second = parser.parse();
    assert_eq!(first, second);
    assert_eq!(first_tokens, parser.tokens());
    assert_eq!(first, Parser::new(input).parse());
}

#[test]
fn test_attribute_alone_is_presence_test() {
    assert_eq!(
        predicate("@tag"),
        Predicate::comparison(Value::attribute("tag"), None, Modifier::CaseInsensitive, None)
    );
}

#[test]
fn test_word_alone_is_text_search() {
    assert_eq!(
        predicate("socks"),
        Predicate::comparison(
            Value::attribute("text"),
            Some(Relation::Contains),
            Modifier::CaseInsensitive,
            Some(Value::literal("socks")),
        )
    );
}

#[test]
fn test_not_not_cancels() {
    assert_eq!(predicate("not not socks"), predicate("socks"));
}

#[rstest]
#[case("uniontown")]
#[case("orchard")]
#[case("andes")]
#[case("nothing")]
#[case("containsx")]
fn test_keyword_prefixed_words_are_strings(#[case] word: &str) {
    assert_eq!(predicate(word), text_contains(word));
}

#[rstest]
#[case("x[1]", Slice::index(1))]
#[case("x[1:2]", Slice::range(Some(1), Some(2)))]
#[case("x[:2]", Slice::range(None, Some(2)))]
#[case("x[1:]", Slice::range(Some(1), None))]
#[case("x[:]", Slice::range(None, None))]
#[case("x[-2:-1]", Slice::range(Some(-2), Some(-1)))]
fn test_slices(#[case] input: &str, #[case] expected: Slice) {
    let path = path(input);
    assert_eq!(path.steps[0].slice, Some(expected));
    assert_eq!(path.steps[0].predicate, text_contains("x"));
}

#[test]
fn test_absolute_and_relative_paths() {
    let absolute = path("/a/b");
    assert!(absolute.absolute);
    assert_eq!(absolute.steps.len(), 2);
    assert_eq!(absolute.steps[1].axis, Axis::Child);

    let relative = path("a/b");
    assert!(!relative.absolute);
    assert_eq!(relative.steps.len(), 2);
}

#[test]
fn test_quoted_string_unescapes() {
    assert_eq!(predicate(r#""a \"b\" c""#), text_contains("a \"b\" c"));
}

#[test]
fn test_set_operators_associate_right() {
    let leaf = |s: &str| LocationExpression::Path(Path::new(false, [Step::new(
        Axis::Child,
        NodeType::Any,
        text_contains(s),
    )]));

    assert_eq!(
        location("a union b union c"),
        LocationExpression::union(leaf("a"), LocationExpression::union(leaf("b"), leaf("c")))
    );
    assert_eq!(
        location("a except b except c"),
        LocationExpression::except(leaf("a"), LocationExpression::except(leaf("b"), leaf("c")))
    );
    assert_eq!(
        location("a intersect b intersect c"),
        LocationExpression::intersect(
            leaf("a"),
            LocationExpression::intersect(leaf("b"), leaf("c"))
        )
    );
}

#[test]
fn test_boolean_operators_associate_right() {
    assert_eq!(
        predicate("a and b and c"),
        Predicate::and(
            text_contains("a"),
            Predicate::and(text_contains("b"), text_contains("c"))
        )
    );
    assert_eq!(
        predicate("a or b or c"),
        Predicate::or(
            text_contains("a"),
            Predicate::or(text_contains("b"), text_contains("c"))
        )
    );
}

#[test]
fn test_long_chains_fold_right() {
    let input = vec!["x"; 2_000].join(" or ");
    let predicate = predicate(&input);
    let mut depth = 0;
    let mut current = &predicate;
    while let Predicate::Or(left, right) = current {
        assert_eq!(**left, text_contains("x"));
        depth += 1;
        current = right;
    }
    assert_eq!(depth, 1_999);
    assert_eq!(*current, text_contains("x"));
}

#[rstest]
#[case("beginswith", Relation::BeginsWith)]
#[case("endswith", Relation::EndsWith)]
#[case("contains", Relation::Contains)]
#[case("matches", Relation::Matches)]
#[case("=", Relation::Equal)]
#[case("!=", Relation::NotEqual)]
#[case("<=", Relation::LessThanOrEqual)]
#[case(">=", Relation::GreaterThanOrEqual)]
#[case("<", Relation::LessThan)]
#[case(">", Relation::GreaterThan)]
fn test_relations(#[case] spelling: &str, #[case] relation: Relation) {
    assert_eq!(
        predicate(&format!("@due {spelling} 2023")),
        Predicate::comparison(
            Value::attribute("due"),
            Some(relation),
            Modifier::CaseInsensitive,
            Some(Value::literal("2023")),
        )
    );
}

#[rstest]
#[case('s', Modifier::CaseSensitive)]
#[case('i', Modifier::CaseInsensitive)]
#[case('n', Modifier::NumericCompare)]
#[case('d', Modifier::DateCompare)]
#[case('l', Modifier::ListCompare)]
fn test_modifiers(#[case] letter: char, #[case] modifier: Modifier) {
    assert_eq!(
        predicate(&format!("@due = [{letter}] 2023")),
        Predicate::comparison(
            Value::attribute("due"),
            Some(Relation::Equal),
            modifier,
            Some(Value::literal("2023")),
        )
    );
}

#[test]
fn test_top_level_function() {
    let expression = parse("count(/heading)").unwrap();
    let PathExpression::Function(function) = expression else {
        panic!("expected a function call");
    };
    assert_eq!(function.name, "count");
    assert_eq!(
        *function.arg,
        LocationExpression::Path(Path::new(
            true,
            [Step::new(Axis::Child, NodeType::Heading, Predicate::Any)]
        ))
    );
}

#[rstest]
#[case("", "expected location expression or function call", 0)]
#[case("   ", "expected location expression or function call", 0)]
#[case("a)", "expected end of input", 1)]
#[case("inbox heading", "expected end of input", 6)]
#[case("a b [x]", "expected location expression or function call", 0)]
fn test_error_messages(#[case] input: &str, #[case] message: &str, #[case] column: usize) {
    let error = parse(input).unwrap_err();
    assert_eq!(error.message, message, "{input:?}");
    assert_eq!(error.column, column, "{input:?}");
    assert_eq!(error.line, 1);
}

#[test]
fn test_error_display_has_caret() {
    let error = parse("a)").unwrap_err();
    assert_eq!(
        error.to_string(),
        "\n(input):1:1: syntax error: expected end of input\na)\n ^\n"
    );
}

#[test]
fn test_errors_on_later_lines() {
    let error = parse("a\nb)").unwrap_err();
    assert_eq!(error.line, 2);
    assert_eq!(error.column, 1);
    assert_eq!(error.line_text, "b)");
}

#[test]
fn test_nesting_limit_is_fatal() {
    let input = format!("{}a{}", "(".repeat(20), ")".repeat(20));
    assert!(Parser::new(&input).with_max_depth(64).parse().is_ok());

    let error = Parser::new(&input).with_max_depth(10).parse().unwrap_err();
    assert!(error.is_fatal());
    assert_eq!(error.message, "expression nested too deeply");
}

#[test]
fn test_deep_nesting_with_default_limit() {
    let input = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
    let error = parse(&input).unwrap_err();
    assert!(error.is_fatal());
}

#[test]
fn test_nested_function_arguments_hit_the_limit() {
    let depth = DEFAULT_MAX_DEPTH as usize;
    let input = format!("@a = {}x{}", "f(".repeat(depth), ")".repeat(depth));
    let error = parse(&input).unwrap_err();
    assert!(error.is_fatal());
    assert_eq!(error.message, "expression nested too deeply");
}

#[test]
fn test_function_arguments_cost_two_levels() {
    let input = "@a = f(@b = g(x))";
    assert!(parse(input).is_ok());
    assert!(Parser::new(input).with_max_depth(5).parse().is_ok());

    let error = Parser::new(input).with_max_depth(4).parse().unwrap_err();
    assert!(error.is_fatal());
}

#[test]
fn test_tokens_serialize_to_json() {
    let (_, tokens) = parse_with_tokens("@done");
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(json[0]["type"], "attribute");
    assert_eq!(json[0]["range"]["start"], 0);
    assert_eq!(json[0]["range"]["end"], 5);
    assert_eq!(json[0]["value"], "@done");
    assert_eq!(json[1]["type"], "comparison");
}

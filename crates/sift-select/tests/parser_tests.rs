//! Integration tests for selector parsing.

use sift_common::warning::has_warned;
use sift_select::{AttributePolicy, AttributeTest, Combinator, ParseError, Selector, parse};

fn steps_of(selector: &str) -> Vec<sift_select::SelectorStep> {
    let mut groups = parse(selector).unwrap();
    assert_eq!(groups.len(), 1, "expected one group in `{selector}`");
    groups.remove(0).steps
}

#[test]
fn test_parse_tag_selector() {
    let steps = steps_of("body");
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].predicates.tags, vec!["body"]);
    assert_eq!(steps[0].combinator, Combinator::Descendant);
    assert!(!steps[0].first_child);
    assert_eq!(steps[0].lang, None);
}

#[test]
fn test_parse_compound_selector() {
    let steps = steps_of("div.highlight#main[data-x]");
    let predicates = &steps[0].predicates;
    assert_eq!(predicates.tags, vec!["div"]);
    assert_eq!(predicates.classes, vec!["highlight"]);
    assert_eq!(predicates.ids, vec!["main"]);
    assert_eq!(
        predicates.attributes,
        vec![AttributeTest {
            name: "data-x".to_string(),
            policy: AttributePolicy::Exists,
            values: vec![],
        }]
    );
}

#[test]
fn test_parse_attribute_operators() {
    let steps = steps_of(r#"[a~="one two"][b|='en'][c="x"][d=plain]"#);
    let attrs = &steps[0].predicates.attributes;
    assert_eq!(attrs.len(), 4);
    assert_eq!(
        (attrs[0].name.as_str(), attrs[0].policy, attrs[0].values.clone()),
        ("a", AttributePolicy::WhitespaceToken, vec!["one two".to_string()])
    );
    assert_eq!(attrs[1].policy, AttributePolicy::HyphenPrefix);
    assert_eq!(attrs[1].values, vec!["en"]);
    assert_eq!(attrs[2].policy, AttributePolicy::Equals);
    assert_eq!(attrs[2].values, vec!["x"]);
    assert_eq!(attrs[3].policy, AttributePolicy::Equals);
    assert_eq!(attrs[3].values, vec!["plain"]);
}

#[test]
fn test_parse_empty_quoted_attribute_value() {
    let steps = steps_of("[title='']");
    assert_eq!(steps[0].predicates.attributes[0].values, vec![""]);
}

#[test]
fn test_repeated_tokens_accumulate_as_alternatives() {
    let steps = steps_of("#a#b.x.y[t='1'][t='2']");
    let predicates = &steps[0].predicates;
    assert_eq!(predicates.ids, vec!["a", "b"]);
    assert_eq!(predicates.classes, vec!["x", "y"]);
    assert_eq!(predicates.attributes.len(), 1);
    assert_eq!(predicates.attributes[0].values, vec!["1", "2"]);
}

#[test]
fn test_parse_positional_filters() {
    let steps = steps_of("li:first-child:lang(en-GB)");
    assert_eq!(steps[0].predicates.tags, vec!["li"]);
    assert!(steps[0].first_child);
    assert_eq!(steps[0].lang.as_deref(), Some("en-GB"));
}

#[test]
fn test_parse_combinators_with_and_without_spaces() {
    for selector in ["div > p + span em", "div>p+span em", "div >p+ span   em"] {
        let steps = steps_of(selector);
        let combinators: Vec<Combinator> = steps.iter().map(|s| s.combinator).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::Sibling,
                Combinator::Descendant
            ],
            "{selector}"
        );
    }
}

#[test]
fn test_leading_combinator_applies_to_first_step() {
    let steps = steps_of("> p");
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].combinator, Combinator::Child);
}

#[test]
fn test_parse_groups() {
    let groups = parse("div p, span , #x").unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].steps.len(), 2);
    assert_eq!(groups[1].steps[0].predicates.tags, vec!["span"]);
    assert_eq!(groups[2].steps[0].predicates.ids, vec!["x"]);
}

#[test]
fn test_quoted_commas_spaces_and_combinators_do_not_split() {
    let groups = parse(r#"a[title="x, y > z + w"], b"#).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].steps.len(), 1);
    assert_eq!(
        groups[0].steps[0].predicates.attributes[0].values,
        vec!["x, y > z + w"]
    );
}

#[test]
fn test_unrecognized_token_is_an_error() {
    assert_eq!(
        parse("div$$bad"),
        Err(ParseError::UnrecognizedToken {
            step: "div$$bad".to_string(),
            remainder: "$$bad".to_string(),
        })
    );
}

#[test]
fn test_failure_in_any_group_rejects_the_selector() {
    assert!(matches!(
        parse("div, p:hover, span"),
        Err(ParseError::UnrecognizedToken { remainder, .. }) if remainder == ":hover"
    ));
}

#[test]
fn test_structural_errors() {
    assert_eq!(parse(""), Err(ParseError::EmptySelector));
    assert_eq!(parse("   "), Err(ParseError::EmptySelector));
    assert_eq!(
        parse("div,,p"),
        Err(ParseError::EmptyGroup {
            selector: "div,,p".to_string(),
            index: 1,
        })
    );
    assert!(matches!(parse("div,"), Err(ParseError::EmptyGroup { index: 1, .. })));
    assert!(matches!(parse("[a='b"), Err(ParseError::UnterminatedQuote { .. })));
    assert!(matches!(
        parse("div >"),
        Err(ParseError::DanglingCombinator { combinator: '>', .. })
    ));
    assert!(matches!(
        parse("div + > p"),
        Err(ParseError::DanglingCombinator { combinator: '+', .. })
    ));
}

#[test]
fn test_unsupported_attribute_operator_is_rejected() {
    assert!(matches!(
        parse("[href^='https']"),
        Err(ParseError::UnrecognizedToken { .. })
    ));
}

#[test]
fn test_selector_from_str_keeps_source() {
    let selector: Selector = "ul > li.item".parse().unwrap();
    assert_eq!(selector.source(), "ul > li.item");
    assert_eq!(selector.to_string(), "ul > li.item");
    assert_eq!(selector.groups().len(), 1);
    assert_eq!(selector.groups()[0].steps.len(), 2);
}

#[test]
fn test_error_messages_name_the_offending_text() {
    let err = parse("div$$bad").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unrecognized selector text `$$bad` in step `div$$bad`"
    );
}

#[test]
fn test_repeated_tokens_emit_one_time_warnings() {
    let _ = parse("#warn-a#warn-b").unwrap();
    let _ = parse(".warn-x.warn-y").unwrap();
    assert!(has_warned(
        "selector",
        "multiple #id tokens in `#warn-a#warn-b` match any one of the ids"
    ));
    assert!(has_warned(
        "selector",
        "multiple .class tokens in `.warn-x.warn-y` match any one of the classes"
    ));
}

#[test]
fn test_single_tokens_do_not_warn() {
    let _ = parse("#solo.single").unwrap();
    assert!(!has_warned(
        "selector",
        "multiple #id tokens in `#solo.single` match any one of the ids"
    ));
}

#[test]
fn test_non_ascii_names_are_rejected() {
    // U+017F folds to `s` and U+212A to `k` under Unicode case folding.
    for selector in ["\u{17F}pan", "#\u{212A}ey", "li:fir\u{17F}t-child"] {
        assert!(
            matches!(parse(selector), Err(ParseError::UnrecognizedToken { .. })),
            "{selector}"
        );
    }
}

#[test]
fn test_quoted_values_keep_non_ascii_text() {
    let steps = steps_of("[title='café']");
    assert_eq!(steps[0].predicates.attributes[0].values, vec!["café"]);
}

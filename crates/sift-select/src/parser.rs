//! Selector tokenizer and parser.
//!
//! A selector string is split into comma-separated groups, each group into
//! whitespace-separated steps, and each step is consumed token by token
//! against an ordered table of grammar rules:
//!
//! ```text
//! [attr~="v"]  [attr|="v"]  [attr="v"]  [attr]  tag  #id  .class  :first-child  :lang(code)
//! ```
//!
//! Splitting is quote-aware, so `[title='a, b > c']` stays one token.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use sift_common::warning::warn_once;

use crate::error::ParseError;

/// Relationship between a step and the step (or context) before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Whitespace: any descendant of the previous match.
    #[default]
    Descendant,
    /// `>`: an immediate child of the previous match.
    Child,
    /// `+`: the element immediately following the previous match.
    Sibling,
}

impl Combinator {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Child),
            '+' => Some(Self::Sibling),
            _ => None,
        }
    }

    const fn as_char(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::Sibling => '+',
        }
    }
}

/// How an attribute test compares the attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributePolicy {
    /// `[attr]`: the attribute is present.
    Exists,
    /// `[attr="v"]`: the value equals `v` exactly.
    Equals,
    /// `[attr~="v"]`: `v` is one of the value's whitespace-separated words.
    WhitespaceToken,
    /// `[attr|="v"]`: the value is `v` or starts with `v-`.
    HyphenPrefix,
}

impl AttributePolicy {
    /// Whether `actual` satisfies this policy for `expected`.
    #[must_use]
    pub fn accepts(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals => actual == expected,
            Self::WhitespaceToken => actual.split_ascii_whitespace().any(|word| word == expected),
            Self::HyphenPrefix => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }

    const fn operator(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::WhitespaceToken => "~=",
            Self::HyphenPrefix => "|=",
        }
    }
}

/// One attribute test of a step.
///
/// `values` holds the alternatives; any one of them satisfying `policy` is
/// enough. It is empty for [`AttributePolicy::Exists`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTest {
    /// Attribute name as written.
    pub name: String,
    /// Comparison policy.
    pub policy: AttributePolicy,
    /// Alternative expected values.
    pub values: Vec<String>,
}

/// The conjunction of constraints one step places on a single element.
///
/// Categories are ANDed; alternatives within `tags`, `ids`, `classes` and an
/// attribute test's `values` are ORed. Empty categories impose nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateSet {
    /// Tag names; `*` matches any element.
    pub tags: Vec<String>,
    /// Id alternatives.
    pub ids: Vec<String>,
    /// Class alternatives.
    pub classes: Vec<String>,
    /// Attribute tests, in source order.
    pub attributes: Vec<AttributeTest>,
}

impl PredicateSet {
    /// Whether the step names no tag or names the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| t == "*")
    }

    fn add_attribute(&mut self, name: &str, policy: AttributePolicy, value: Option<&str>) {
        let existing = self
            .attributes
            .iter_mut()
            .find(|test| test.policy == policy && test.name.eq_ignore_ascii_case(name));
        match (existing, value) {
            (Some(test), Some(value)) => test.values.push(value.to_string()),
            (Some(_), None) => {}
            (None, value) => self.attributes.push(AttributeTest {
                name: name.to_string(),
                policy,
                values: value.map(str::to_string).into_iter().collect(),
            }),
        }
    }
}

/// One compound selector plus the combinator that links it to the previous step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorStep {
    /// Relationship to the previous step's matches (or to the query context).
    pub combinator: Combinator,
    /// Constraints on the element itself.
    pub predicates: PredicateSet,
    /// `:first-child`: the element must be its parent's first element child.
    pub first_child: bool,
    /// `:lang(code)`: the element or an ancestor must carry `lang="code"`.
    pub lang: Option<String>,
}

/// A comma-separated alternative: steps evaluated left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup {
    /// Steps in source order. Never empty.
    pub steps: Vec<SelectorStep>,
}

/// A parsed selector, ready to evaluate against any number of trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<SelectorGroup>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if any part of the selector is malformed;
    /// no partially parsed selector is ever produced.
    pub fn parse(selector: &str) -> Result<Self, ParseError> {
        Ok(Self {
            source: selector.to_string(),
            groups: parse(selector)?,
        })
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The comma-separated groups, in source order.
    #[must_use]
    pub fn groups(&self) -> &[SelectorGroup] {
        &self.groups
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Which predicate a grammar rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleKind {
    WhitespaceAttribute,
    HyphenAttribute,
    AttributeEquals,
    AttributeExists,
    Tag,
    Id,
    Class,
    FirstChild,
    Lang,
}

struct GrammarRule {
    kind: RuleKind,
    pattern: Regex,
}

// Rules run with Unicode off, so `(?i)` folds ASCII only and `ſ` or `K` is
// never read as a letter. Quoted values alone may hold non-ASCII text.
const ATTR_NAME: &str = r"([a-z_][-a-z0-9_]*)";
const ATTR_VALUE: &str = r#"(?:"((?u:[^"]*))"|'((?u:[^']*))'|([-a-z0-9_.]+))"#;

fn attribute_rule(operator: &str) -> String {
    format!(r"(?i-u)^\[\s*{ATTR_NAME}\s*{operator}\s*{ATTR_VALUE}\s*\]")
}

/// Grammar rules in precedence order. The operator forms come before the
/// plain `=` and presence forms so that `[a~="b"]` is never read as `[a]`.
static RULES: LazyLock<Vec<GrammarRule>> = LazyLock::new(|| {
    let table = [
        (RuleKind::WhitespaceAttribute, attribute_rule("~=")),
        (RuleKind::HyphenAttribute, attribute_rule(r"\|=")),
        (RuleKind::AttributeEquals, attribute_rule("=")),
        (
            RuleKind::AttributeExists,
            format!(r"(?i-u)^\[\s*{ATTR_NAME}\s*\]"),
        ),
        (RuleKind::Tag, r"(?i-u)^(\*|[a-z][a-z0-9-]*)".to_string()),
        (RuleKind::Id, r"(?i-u)^#([a-z_][-a-z0-9_]*)".to_string()),
        (RuleKind::Class, r"(?i-u)^\.(-?[a-z_][-a-z0-9_]*)".to_string()),
        (RuleKind::FirstChild, r"(?i-u)^:first-child".to_string()),
        (RuleKind::Lang, r"(?i-u)^:lang\(\s*([a-z0-9-]+)\s*\)".to_string()),
    ];
    table
        .into_iter()
        .map(|(kind, pattern)| GrammarRule {
            kind,
            pattern: Regex::new(&pattern).expect("selector grammar rule is a valid regex"),
        })
        .collect()
});

/// The first rule that matches at the start of `text`, with its captures.
pub(crate) fn match_rule(text: &str) -> Option<(RuleKind, Captures<'_>)> {
    RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(text).map(|caps| (rule.kind, caps)))
}

/// Parse a selector string into its groups.
///
/// # Errors
///
/// See [`ParseError`]. A failure anywhere rejects the whole selector.
pub fn parse(selector: &str) -> Result<Vec<SelectorGroup>, ParseError> {
    if selector.trim().is_empty() {
        return Err(ParseError::EmptySelector);
    }

    let raw_groups = split_outside_quotes(selector, |c| c == ',').ok_or_else(|| {
        ParseError::UnterminatedQuote {
            selector: selector.to_string(),
        }
    })?;

    let groups = raw_groups
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            if raw.trim().is_empty() {
                return Err(ParseError::EmptyGroup {
                    selector: selector.to_string(),
                    index,
                });
            }
            parse_group(raw)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(selector, groups = groups.len(), "parsed selector");
    Ok(groups)
}

fn parse_group(raw: &str) -> Result<SelectorGroup, ParseError> {
    let padded = pad_combinators(raw);
    // Quotes were balanced for the whole selector, so they are balanced here.
    let segments = split_outside_quotes(&padded, |c| c.is_ascii_whitespace()).unwrap_or_default();

    let mut steps = Vec::new();
    let mut pending: Option<Combinator> = None;
    for segment in segments.into_iter().filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(combinator) = Combinator::from_char(c)
        {
            if pending.is_some() {
                return Err(ParseError::DanglingCombinator {
                    group: raw.trim().to_string(),
                    combinator: pending.map_or(c, Combinator::as_char),
                });
            }
            pending = Some(combinator);
            continue;
        }
        let mut step = parse_step(segment)?;
        step.combinator = pending.take().unwrap_or_default();
        steps.push(step);
    }

    if let Some(combinator) = pending {
        return Err(ParseError::DanglingCombinator {
            group: raw.trim().to_string(),
            combinator: combinator.as_char(),
        });
    }

    Ok(SelectorGroup { steps })
}

/// Strip grammar tokens off the front of `raw` until nothing is left.
pub(crate) fn parse_step(raw: &str) -> Result<SelectorStep, ParseError> {
    let mut step = SelectorStep::default();
    let mut rest = raw;

    while !rest.is_empty() {
        let Some((kind, caps)) = match_rule(rest) else {
            return Err(ParseError::UnrecognizedToken {
                step: raw.to_string(),
                remainder: rest.to_string(),
            });
        };
        let consumed = caps.get(0).map_or(0, |m| m.end());
        apply_rule(&mut step, kind, &caps);
        rest = &rest[consumed..];
    }

    warn_on_alternatives(raw, &step.predicates);
    Ok(step)
}

fn apply_rule(step: &mut SelectorStep, kind: RuleKind, caps: &Captures<'_>) {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    // Quoted double, quoted single, or unquoted.
    let value = || {
        (2..=4)
            .find_map(|i| caps.get(i))
            .map_or("", |m| m.as_str())
    };

    match kind {
        RuleKind::WhitespaceAttribute => {
            step.predicates
                .add_attribute(group(1), AttributePolicy::WhitespaceToken, Some(value()));
        }
        RuleKind::HyphenAttribute => {
            step.predicates
                .add_attribute(group(1), AttributePolicy::HyphenPrefix, Some(value()));
        }
        RuleKind::AttributeEquals => {
            step.predicates
                .add_attribute(group(1), AttributePolicy::Equals, Some(value()));
        }
        RuleKind::AttributeExists => {
            step.predicates
                .add_attribute(group(1), AttributePolicy::Exists, None);
        }
        RuleKind::Tag => step.predicates.tags.push(group(1).to_string()),
        RuleKind::Id => step.predicates.ids.push(group(1).to_string()),
        RuleKind::Class => step.predicates.classes.push(group(1).to_string()),
        RuleKind::FirstChild => step.first_child = true,
        RuleKind::Lang => step.lang = Some(group(1).to_string()),
    }
}

fn warn_on_alternatives(raw: &str, predicates: &PredicateSet) {
    if predicates.ids.len() > 1 {
        warn_once(
            "selector",
            &format!("multiple #id tokens in `{raw}` match any one of the ids"),
        );
    }
    if predicates.classes.len() > 1 {
        warn_once(
            "selector",
            &format!("multiple .class tokens in `{raw}` match any one of the classes"),
        );
    }
    if predicates.tags.len() > 1 {
        warn_once(
            "selector",
            &format!("multiple tag names in `{raw}` match any one of the tags"),
        );
    }
    for test in predicates.attributes.iter().filter(|t| t.values.len() > 1) {
        warn_once(
            "selector",
            &format!(
                "repeated [{}{}] tests in `{raw}` match any one of the values",
                test.name,
                test.policy.operator()
            ),
        );
    }
}

/// Surround `>` and `+` outside quotes with spaces so they split as their
/// own segments.
fn pad_combinators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut quote: Option<char> = None;
    for c in raw.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => {
                quote = None;
                out.push(c);
            }
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push(c);
            }
            (None, '>' | '+') => {
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Split `input` on characters accepted by `is_separator`, ignoring
/// separators inside `'...'` or `"..."`. Returns `None` if a quote is left
/// open. Empty pieces are kept.
pub(crate) fn split_outside_quotes(
    input: &str,
    is_separator: impl Fn(char) -> bool,
) -> Option<Vec<&str>> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if is_separator(c) => {
                pieces.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }

    if quote.is_some() {
        return None;
    }
    pieces.push(&input[start..]);
    Some(pieces)
}

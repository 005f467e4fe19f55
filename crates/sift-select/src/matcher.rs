//! Compound-selector matching.
//!
//! A pure test of one element against one step's [`PredicateSet`]. Finding
//! the candidates to test is the search driver's job; nothing here walks the
//! tree.

use sift_dom::ElementTree;

use crate::parser::{AttributeTest, PredicateSet};

/// Whether `node` satisfies every category of `predicates`.
///
/// Non-element nodes never match.
#[must_use]
pub fn matches<T: ElementTree>(tree: &T, node: T::Node, predicates: &PredicateSet) -> bool {
    let Some(tag_name) = tree.tag_name(node) else {
        return false;
    };

    tag_matches(tag_name, &predicates.tags)
        && class_matches(&tree.class_list(node), &predicates.classes)
        && id_matches(tree.id(node), &predicates.ids)
        && predicates
            .attributes
            .iter()
            .all(|test| attribute_matches(tree.attribute(node, &test.name), test))
}

/// Tag names compare ASCII case-insensitively; `*` matches anything.
fn tag_matches(tag_name: &str, tags: &[String]) -> bool {
    tags.is_empty()
        || tags
            .iter()
            .any(|tag| tag == "*" || tag.eq_ignore_ascii_case(tag_name))
}

/// At least one required class must be a whole token of the class list.
fn class_matches(class_list: &[&str], classes: &[String]) -> bool {
    classes.is_empty() || classes.iter().any(|c| class_list.contains(&c.as_str()))
}

/// Ids compare exactly.
fn id_matches(id: Option<&str>, ids: &[String]) -> bool {
    ids.is_empty() || id.is_some_and(|id| ids.iter().any(|wanted| wanted == id))
}

fn attribute_matches(actual: Option<&str>, test: &AttributeTest) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    test.values.is_empty()
        || test
            .values
            .iter()
            .any(|expected| test.policy.accepts(actual, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_categories_pass() {
        assert!(tag_matches("div", &[]));
        assert!(class_matches(&[], &[]));
        assert!(id_matches(None, &[]));
    }

    #[test]
    fn class_match_is_whole_token() {
        let list = ["nav-item", "active"];
        assert!(class_matches(&list, &["active".to_string()]));
        assert!(!class_matches(&list, &["nav".to_string()]));
    }

    #[test]
    fn tag_alternatives_and_wildcard() {
        let tags = vec!["p".to_string(), "SPAN".to_string()];
        assert!(tag_matches("span", &tags));
        assert!(!tag_matches("div", &tags));
        assert!(tag_matches("div", &["*".to_string()]));
    }
}

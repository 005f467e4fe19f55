//! Candidate search for one selector step.
//!
//! The search driver turns a context node and a step into the candidates
//! the step could match: it builds a pool from by-tag enumerations, then
//! narrows it by the step's combinator and positional filters. The compound
//! matcher runs afterwards on whatever survives.

use sift_dom::ElementTree;

use crate::parser::{Combinator, SelectorStep};

/// Candidates for `step` relative to a single `context` node, in pool order.
///
/// - The pool is every descendant element of the context (of the context's
///   parent for [`Combinator::Sibling`]) whose tag is one of the step's tags,
///   or every descendant element when the step has no tag or a `*`. With
///   several tags the per-tag enumerations are concatenated.
/// - [`Combinator::Child`] keeps candidates whose parent is `context`;
///   [`Combinator::Sibling`] keeps only the next element sibling of
///   `context`.
/// - `:first-child` and `:lang()` then filter what is left.
#[must_use]
pub fn search<T: ElementTree>(tree: &T, context: T::Node, step: &SelectorStep) -> Vec<T::Node> {
    let scope = match step.combinator {
        Combinator::Sibling => match tree.parent(context) {
            Some(parent) => parent,
            None => return Vec::new(),
        },
        Combinator::Descendant | Combinator::Child => context,
    };

    let pool = candidate_pool(tree, scope, step);
    let next_sibling = match step.combinator {
        Combinator::Sibling => tree.next_element_sibling(context),
        Combinator::Descendant | Combinator::Child => None,
    };

    pool.into_iter()
        .filter(|&candidate| match step.combinator {
            Combinator::Descendant => true,
            Combinator::Child => tree.parent(candidate) == Some(context),
            Combinator::Sibling => next_sibling == Some(candidate),
        })
        .filter(|&candidate| !step.first_child || is_first_child(tree, candidate))
        .filter(|&candidate| {
            step.lang
                .as_deref()
                .is_none_or(|lang| has_lang(tree, candidate, lang))
        })
        .collect()
}

/// Run [`search`] once per context node and concatenate, in context order.
///
/// Each context node is evaluated on its own, so "child of" and "next
/// sibling of" stay relative to that node rather than to the set as a whole.
#[must_use]
pub fn search_all<T: ElementTree>(
    tree: &T,
    contexts: &[T::Node],
    step: &SelectorStep,
) -> Vec<T::Node> {
    contexts
        .iter()
        .flat_map(|&context| search(tree, context, step))
        .collect()
}

fn candidate_pool<T: ElementTree>(tree: &T, scope: T::Node, step: &SelectorStep) -> Vec<T::Node> {
    if step.predicates.is_wildcard() {
        return tree.descendants_by_tag(scope, "*");
    }
    step.predicates
        .tags
        .iter()
        .flat_map(|tag| tree.descendants_by_tag(scope, tag))
        .collect()
}

/// Whether `node` is its parent's first element child.
#[must_use]
pub fn is_first_child<T: ElementTree>(tree: &T, node: T::Node) -> bool {
    tree.parent(node)
        .and_then(|parent| tree.first_element_child(parent))
        == Some(node)
}

/// Whether `node` or one of its ancestors carries `lang` exactly equal to `lang`.
#[must_use]
pub fn has_lang<T: ElementTree>(tree: &T, node: T::Node, lang: &str) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if tree.attribute(id, "lang") == Some(lang) {
            return true;
        }
        current = tree.parent(id);
    }
    false
}

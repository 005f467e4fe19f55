//! Result assembly: runs parsed groups against a tree.
//!
//! Each group is evaluated left to right. Step 0 searches from the query
//! context; every later step searches from the previous step's result. Group
//! results are concatenated and de-duplicated, first occurrence winning.
//! There is no backtracking: a step that matches nothing ends its group.

use std::hash::Hash;

use sift_dom::ElementTree;

use crate::error::ParseError;
use crate::matcher::matches;
use crate::node_set::NodeSet;
use crate::parser::{Selector, SelectorGroup, SelectorStep};
use crate::search::search_all;

/// Where a query starts.
#[derive(Debug, Clone, Copy)]
pub enum MatchContext<'a, N> {
    /// The tree's document root.
    Root,
    /// A single node.
    Node(N),
    /// Every node of a previous result, each searched independently.
    Nodes(&'a [N]),
}

impl<N: Copy> MatchContext<'_, N> {
    fn resolve(self, root: N) -> Vec<N> {
        match self {
            Self::Root => vec![root],
            Self::Node(node) => vec![node],
            Self::Nodes(nodes) => nodes.to_vec(),
        }
    }
}

impl<'a, N: Copy + Eq + Hash> From<&'a NodeSet<N>> for MatchContext<'a, N> {
    fn from(set: &'a NodeSet<N>) -> Self {
        Self::Nodes(set.as_slice())
    }
}

impl Selector {
    /// Evaluate this selector against `tree`.
    ///
    /// The tree is borrowed for the whole call, so the result reflects one
    /// consistent state of it.
    #[must_use]
    pub fn evaluate<T: ElementTree>(
        &self,
        tree: &T,
        context: MatchContext<'_, T::Node>,
    ) -> NodeSet<T::Node> {
        let contexts = context.resolve(tree.root());
        let found = evaluate(tree, self.groups(), &contexts);
        tracing::debug!(
            selector = self.source(),
            contexts = contexts.len(),
            matched = found.len(),
            "evaluated selector"
        );
        found
    }
}

/// Evaluate parsed groups from `contexts` and merge the results.
#[must_use]
pub fn evaluate<T: ElementTree>(
    tree: &T,
    groups: &[SelectorGroup],
    contexts: &[T::Node],
) -> NodeSet<T::Node> {
    let mut found = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        let matched = evaluate_group(tree, group, contexts);
        tracing::debug!(group = index, matched = matched.len(), "evaluated group");
        found.extend(matched);
    }
    found.into_iter().collect()
}

fn evaluate_group<T: ElementTree>(
    tree: &T,
    group: &SelectorGroup,
    contexts: &[T::Node],
) -> NodeSet<T::Node> {
    let mut current: NodeSet<T::Node> = contexts.iter().copied().collect();
    for (index, step) in group.steps.iter().enumerate() {
        current = evaluate_step(tree, current.as_slice(), step);
        tracing::trace!(step = index, matched = current.len(), "evaluated step");
        if current.is_empty() {
            break;
        }
    }
    current
}

/// One step of a group: search from every context node, then keep the
/// candidates the compound matcher accepts.
#[must_use]
pub fn evaluate_step<T: ElementTree>(
    tree: &T,
    contexts: &[T::Node],
    step: &SelectorStep,
) -> NodeSet<T::Node> {
    search_all(tree, contexts, step)
        .into_iter()
        .filter(|&candidate| matches(tree, candidate, &step.predicates))
        .collect()
}

/// Parse `selector` and evaluate it from `context`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the selector is malformed. Nothing is
/// evaluated in that case.
pub fn query<T: ElementTree>(
    tree: &T,
    selector: &str,
    context: MatchContext<'_, T::Node>,
) -> Result<NodeSet<T::Node>, ParseError> {
    Ok(Selector::parse(selector)?.evaluate(tree, context))
}

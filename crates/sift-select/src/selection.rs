//! Chainable query results.

use sift_dom::ElementTree;

use crate::engine::MatchContext;
use crate::error::ParseError;
use crate::node_set::NodeSet;
use crate::parser::Selector;

/// The nodes a query matched, together with the tree they belong to.
///
/// A `Selection` can be re-queried with [`Selection::find`], which searches
/// inside each of its nodes.
#[derive(Debug)]
pub struct Selection<'t, T: ElementTree> {
    tree: &'t T,
    nodes: NodeSet<T::Node>,
}

impl<T: ElementTree> Clone for Selection<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            nodes: self.nodes.clone(),
        }
    }
}

impl<'t, T: ElementTree> Selection<'t, T> {
    /// Query the whole document.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the selector is malformed.
    pub fn select(tree: &'t T, selector: &str) -> Result<Self, ParseError> {
        Self::run(tree, selector, MatchContext::Root)
    }

    /// Query the subtree under `context`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the selector is malformed.
    pub fn select_within(
        tree: &'t T,
        selector: &str,
        context: T::Node,
    ) -> Result<Self, ParseError> {
        Self::run(tree, selector, MatchContext::Node(context))
    }

    /// Adopt an existing node as a one-element selection.
    #[must_use]
    pub fn from_node(tree: &'t T, node: T::Node) -> Self {
        Self::from_nodes(tree, [node])
    }

    /// Wrap already-known nodes. Duplicates are dropped, order is kept.
    #[must_use]
    pub fn from_nodes(tree: &'t T, nodes: impl IntoIterator<Item = T::Node>) -> Self {
        Self {
            tree,
            nodes: nodes.into_iter().collect(),
        }
    }

    fn run(
        tree: &'t T,
        selector: &str,
        context: MatchContext<'_, T::Node>,
    ) -> Result<Self, ParseError> {
        let selector = Selector::parse(selector)?;
        Ok(Self {
            tree,
            nodes: selector.evaluate(tree, context),
        })
    }

    /// Query inside every node of this selection.
    ///
    /// Each node is a separate context: `> p` finds the `p` children of each
    /// node, not of the selection as a whole.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the selector is malformed.
    pub fn find(&self, selector: &str) -> Result<Self, ParseError> {
        Ok(self.find_compiled(&Selector::parse(selector)?))
    }

    /// [`Selection::find`] with a selector parsed ahead of time.
    #[must_use]
    pub fn find_compiled(&self, selector: &Selector) -> Self {
        Self {
            tree: self.tree,
            nodes: selector.evaluate(self.tree, MatchContext::from(&self.nodes)),
        }
    }

    /// The tree the nodes belong to.
    #[must_use]
    pub const fn tree(&self) -> &'t T {
        self.tree
    }

    /// Number of matched nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T::Node> {
        self.nodes.get(index)
    }

    /// The first matched node.
    #[must_use]
    pub fn first(&self) -> Option<T::Node> {
        self.nodes.first()
    }

    /// Iterate over matched nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = T::Node> + '_ {
        self.nodes.iter()
    }

    /// The matched nodes.
    #[must_use]
    pub const fn nodes(&self) -> &NodeSet<T::Node> {
        &self.nodes
    }

    /// Drop the tree borrow and keep the nodes.
    #[must_use]
    pub fn into_node_set(self) -> NodeSet<T::Node> {
        self.nodes
    }
}

//! Ordered, duplicate-free node collections.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Index;

/// An ordered sequence of distinct nodes.
///
/// Order is insertion order: the position of a node is the position at which
/// it was first inserted. Inserting a node that is already present is a no-op.
#[derive(Debug, Clone)]
pub struct NodeSet<N> {
    nodes: Vec<N>,
    seen: HashSet<N>,
}

impl<N: Copy + Eq + Hash> NodeSet<N> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append `node` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, node: N) -> bool {
        let added = self.seen.insert(node);
        if added {
            self.nodes.push(node);
        }
        added
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the set holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    /// The first node, if any.
    #[must_use]
    pub fn first(&self) -> Option<N> {
        self.nodes.first().copied()
    }

    /// Whether `node` is in the set.
    #[must_use]
    pub fn contains(&self, node: N) -> bool {
        self.seen.contains(&node)
    }

    /// Nodes in order.
    #[must_use]
    pub fn as_slice(&self) -> &[N] {
        &self.nodes
    }

    /// Iterate over the nodes in order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, N>> {
        self.nodes.iter().copied()
    }

    /// Consume the set, keeping the order.
    #[must_use]
    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

impl<N: Copy + Eq + Hash> Default for NodeSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash> Extend<N> for NodeSet<N> {
    fn extend<I: IntoIterator<Item = N>>(&mut self, iter: I) {
        for node in iter {
            let _ = self.insert(node);
        }
    }
}

impl<N: Copy + Eq + Hash> FromIterator<N> for NodeSet<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<N> IntoIterator for NodeSet<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, N: Copy> IntoIterator for &'a NodeSet<N> {
    type Item = N;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl<N> Index<usize> for NodeSet<N> {
    type Output = N;

    fn index(&self, index: usize) -> &N {
        &self.nodes[index]
    }
}

/// Two sets are equal when they hold the same nodes in the same order.
impl<N: PartialEq> PartialEq for NodeSet<N> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<N: Eq> Eq for NodeSet<N> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let set: NodeSet<u32> = [3, 1, 3, 2, 1, 4].into_iter().collect();
        assert_eq!(set.as_slice(), &[3, 1, 2, 4]);
        assert_eq!(set.len(), 4);
        assert!(set.contains(2));
        assert!(!set.contains(5));
    }

    #[test]
    fn insert_reports_novelty() {
        let mut set = NodeSet::new();
        assert!(set.insert(7_u8));
        assert!(!set.insert(7));
        assert_eq!(set[0], 7);
    }
}

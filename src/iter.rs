use alloc::vec::{self, Vec};
use core::{fmt, iter::FusedIterator};

use crate::Color;
use crate::utils::{NIL, RawTree};

/// In-order walk over arena indices using an explicit stack.
pub(crate) struct Indices<'a, K> {
    tree: &'a RawTree<K>,
    /// Nodes whose left subtree has been entered but which are not yet yielded
    stack: Vec<usize>,
    remaining: usize,
}

impl<'a, K> Indices<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>) -> Self {
        let mut indices = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        indices.descend_left(tree.root());
        indices
    }

    fn descend_left(&mut self, mut idx: usize) {
        while idx != NIL {
            self.stack.push(idx);
            idx = self.tree.left(idx);
        }
    }
}

impl<K> Clone for Indices<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K> Iterator for Indices<'_, K> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.stack.pop()?;
        self.descend_left(self.tree.right(idx));
        self.remaining = self.remaining.saturating_sub(1);
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Borrowing in-order iterator over the keys of a tree.
///
/// Created by `iter()` on either tree. The borrow keeps the tree frozen for
/// as long as the iterator lives. Cloning forks the walk at its current position.
pub struct Iter<'a, K> {
    indices: Indices<'a, K>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>) -> Self {
        Self {
            indices: Indices::new(tree),
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            indices: self.indices.clone(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.indices.tree;
        self.indices.next().map(|idx| tree.key(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

/// Owned in-order snapshot of a tree's keys.
///
/// The keys are copied out when the snapshot is taken, so later mutation of
/// the tree does not affect it. Clone it to replay the sequence.
#[derive(Debug, Clone)]
pub struct Elements<K> {
    inner: vec::IntoIter<K>,
}

impl<K: Clone> Elements<K> {
    pub(crate) fn snapshot(tree: &RawTree<K>) -> Self {
        let keys: Vec<K> = Iter::new(tree).cloned().collect();
        Self {
            inner: keys.into_iter(),
        }
    }
}

impl<K> Iterator for Elements<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Elements<K> {
    #[inline]
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for Elements<K> {}

impl<K> FusedIterator for Elements<K> {}

/// Detached copy of one red-black node and the keys of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry<K> {
    /// The node's key
    pub key: K,
    /// The node's color at snapshot time
    pub color: Color,
    /// Key of the parent, `None` for the root
    pub parent: Option<K>,
    /// Key of the left child, if any
    pub left: Option<K>,
    /// Key of the right child, if any
    pub right: Option<K>,
}

impl<K: Clone> NodeEntry<K> {
    fn capture(tree: &RawTree<K>, idx: usize) -> Self {
        let node = tree.node(idx);
        let key_at = |idx: usize| (idx != NIL).then(|| tree.key(idx).clone());
        Self {
            key: node.key.clone(),
            color: node.color,
            parent: key_at(node.parent),
            left: key_at(node.left),
            right: key_at(node.right),
        }
    }

    /// Returns `true` if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Owned in-order snapshot of a red-black tree's nodes.
#[derive(Debug, Clone)]
pub struct Nodes<K> {
    inner: vec::IntoIter<NodeEntry<K>>,
}

impl<K: Clone> Nodes<K> {
    pub(crate) fn snapshot(tree: &RawTree<K>) -> Self {
        let entries: Vec<NodeEntry<K>> = Indices::new(tree)
            .map(|idx| NodeEntry::capture(tree, idx))
            .collect();
        Self {
            inner: entries.into_iter(),
        }
    }
}

impl<K> Iterator for Nodes<K> {
    type Item = NodeEntry<K>;

    #[inline]
    fn next(&mut self) -> Option<NodeEntry<K>> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Nodes<K> {
    #[inline]
    fn next_back(&mut self) -> Option<NodeEntry<K>> {
        self.inner.next_back()
    }
}

impl<K> ExactSizeIterator for Nodes<K> {}

impl<K> FusedIterator for Nodes<K> {}

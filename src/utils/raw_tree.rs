use ahash::RandomState;
use alloc::vec::Vec;
use core::{borrow::Borrow, cmp::Ordering};
use hashbrown::HashSet;

use super::arena::Arena;
use super::node::{Color, NIL, Node, Side};
use crate::{TreeError, iter::Indices};

/// Result of physically unlinking a node from the tree.
///
/// Every index in here refers to the live tree as it stands right after the
/// splice, which is what the removal fixup walks.
#[derive(Debug)]
pub(crate) struct Splice<K> {
    /// Key that left the tree
    pub(crate) key: K,

    /// Color of the node that was physically unlinked
    pub(crate) color: Color,

    /// Arena index of the unlinked node, vacant by now
    pub(crate) removed: usize,

    /// Child that took the unlinked node's place (NIL if none)
    pub(crate) replacement: usize,

    /// Former parent of the unlinked node (NIL if it was the root)
    pub(crate) parent: usize,

    /// Side of `parent` now holding `replacement`, meaningless when `parent` is NIL
    pub(crate) side: Side,

    /// Node that received the in-order predecessor's key (NIL for a plain splice)
    pub(crate) promoted: usize,
}

/// Arena-backed binary search tree without any balancing policy.
///
/// Both public trees are thin layers over this type: the unbalanced tree uses it
/// as is, the red-black tree drives its rotations and colors from the outside.
#[derive(Debug, Clone)]
pub(crate) struct RawTree<K> {
    /// Storage for every node reachable from `root`
    arena: Arena<K>,

    /// Index of the root node, NIL when the tree is empty
    root: usize,
}

impl<K> RawTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: NIL,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: NIL,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.root == NIL
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    #[inline]
    pub(crate) const fn root(&self) -> usize {
        self.root
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
    }

    #[inline]
    pub(crate) fn node(&self, idx: usize) -> &Node<K> {
        self.arena.get(idx)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node<K> {
        self.arena.get_mut(idx)
    }

    #[inline]
    pub(crate) fn key(&self, idx: usize) -> &K {
        &self.node(idx).key
    }

    #[inline]
    pub(crate) fn parent(&self, idx: usize) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node(idx).parent
        }
    }

    #[inline]
    pub(crate) fn left(&self, idx: usize) -> usize {
        self.child(idx, Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self, idx: usize) -> usize {
        self.child(idx, Side::Right)
    }

    #[inline]
    pub(crate) fn child(&self, idx: usize, side: Side) -> usize {
        if idx == NIL {
            NIL
        } else {
            self.node(idx).child(side)
        }
    }

    /// Absent nodes count as black.
    #[inline]
    pub(crate) fn color(&self, idx: usize) -> Color {
        if idx == NIL {
            Color::Black
        } else {
            self.node(idx).color
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, idx: usize, color: Color) {
        if idx != NIL {
            self.node_mut(idx).color = color;
        }
    }

    pub(crate) fn swap_colors(&mut self, a: usize, b: usize) {
        let (color_a, color_b) = (self.color(a), self.color(b));
        self.set_color(a, color_b);
        self.set_color(b, color_a);
    }

    /// Side of its parent that `idx` hangs from. The node must not be the root.
    #[inline]
    pub(crate) fn side_of(&self, idx: usize) -> Side {
        let parent = self.parent(idx);
        debug_assert!(parent != NIL, "root node {idx} has no side");
        if self.left(parent) == idx {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// The other child of `idx`'s parent, NIL for the root.
    pub(crate) fn sibling(&self, idx: usize) -> usize {
        if self.parent(idx) == NIL {
            return NIL;
        }
        self.child(self.parent(idx), self.side_of(idx).opposite())
    }

    pub(crate) fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.left(node);
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    pub(crate) fn find_maximum(&self, mut node: usize) -> usize {
        while node != NIL {
            let right = self.right(node);
            if right == NIL {
                break;
            }
            node = right;
        }
        node
    }

    /// Ordered descent from the root, NIL when the key is absent.
    pub(crate) fn search<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;

        while current != NIL {
            let node = self.node(current);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return current,
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        NIL
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            NIL => None,
            idx => Some(self.key(idx)),
        }
    }

    pub(crate) fn root_key(&self) -> Result<&K, TreeError> {
        if self.root == NIL {
            Err(TreeError::Empty)
        } else {
            Ok(self.key(self.root))
        }
    }

    pub(crate) fn is_root<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root != NIL && key.cmp(self.key(self.root).borrow()) == Ordering::Equal
    }

    /// Key of the node sharing a parent with the node holding `key`.
    pub(crate) fn brother<Q>(&self, key: &Q) -> Result<Option<&K>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root == NIL {
            return Err(TreeError::Empty);
        }
        match self.search(key) {
            NIL => Err(TreeError::KeyNotFound),
            idx => match self.sibling(idx) {
                NIL => Ok(None),
                sibling => Ok(Some(self.key(sibling))),
            },
        }
    }

    /// Attaches a new red leaf at the slot the descent ends on.
    ///
    /// Returns `None` and leaves the tree untouched if an equal key is present.
    pub(crate) fn insert(&mut self, key: K) -> Option<usize>
    where
        K: Ord,
    {
        let mut parent = NIL;
        let mut side = Side::Left;
        let mut current = self.root;

        while current != NIL {
            let node = self.node(current);
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return None,
            };
            parent = current;
            current = node.child(side);
        }

        let idx = self.arena.alloc(Node::new(key, parent));
        if parent == NIL {
            self.root = idx;
        } else {
            self.node_mut(parent).set_child(side, idx);
        }
        log::debug!("attached node {idx} on the {side} of {parent}");
        Some(idx)
    }

    /// Removes the key held by `idx` from the tree structure.
    ///
    /// A node with two children keeps its slot and takes over the key of its
    /// in-order predecessor, which is the node physically unlinked instead.
    pub(crate) fn remove(&mut self, idx: usize) -> Splice<K> {
        let node = self.node(idx);
        let (left, right) = (node.left, node.right);

        if left != NIL && right != NIL {
            let predecessor = self.find_maximum(left);
            self.swap_keys(idx, predecessor);
            let mut splice = self.splice(predecessor);
            splice.promoted = idx;
            splice
        } else {
            self.splice(idx)
        }
    }

    /// Unlinks a node with at most one child, moving that child into its place.
    fn splice(&mut self, idx: usize) -> Splice<K> {
        let node = self.node(idx);
        debug_assert!(
            node.left == NIL || node.right == NIL,
            "splice of node {idx} with two children"
        );

        let replacement = if node.left != NIL {
            node.left
        } else {
            node.right
        };
        let parent = node.parent;
        let color = node.color;
        let side = if parent == NIL {
            Side::Left
        } else {
            self.side_of(idx)
        };

        self.transplant(idx, replacement);
        let node = self.arena.free(idx);
        log::debug!("spliced node {idx}, replacement {replacement} under {parent}");

        Splice {
            key: node.key,
            color,
            removed: idx,
            replacement,
            parent,
            side,
            promoted: NIL,
        }
    }

    fn swap_keys(&mut self, a: usize, b: usize) {
        self.arena.swap_keys(a, b);
    }

    /// Points the parent of `old` (or the root) at `new` and adopts `new` under it.
    fn transplant(&mut self, old: usize, new: usize) {
        let parent = self.node(old).parent;

        if parent == NIL {
            self.root = new;
        } else if old == self.left(parent) {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }

        if new != NIL {
            self.node_mut(new).parent = parent;
        }
    }

    /// Moves `pivot` one level down towards `side`, lifting its child on the
    /// opposite side into its place. Colors are left alone.
    fn rotate(&mut self, pivot: usize, side: Side) {
        let up = self.child(pivot, side.opposite());
        debug_assert!(
            pivot != NIL && up != NIL,
            "rotation of node {pivot} without a child to lift"
        );

        let inner = self.node(up).child(side);
        self.node_mut(pivot).set_child(side.opposite(), inner);
        if inner != NIL {
            self.node_mut(inner).parent = pivot;
        }

        self.transplant(pivot, up);

        self.node_mut(up).set_child(side, pivot);
        self.node_mut(pivot).parent = up;
        log::trace!("rotated {pivot} {side} under {up}");
    }

    pub(crate) fn rotate_left(&mut self, pivot: usize) {
        self.rotate(pivot, Side::Left);
    }

    pub(crate) fn rotate_right(&mut self, pivot: usize) {
        self.rotate(pivot, Side::Right);
    }

    /// Rotates `idx` above its parent.
    ///
    /// With a grandparent present this is the local single rotation; when the
    /// parent was the root, `idx` becomes the new root.
    pub(crate) fn lift(&mut self, idx: usize) {
        let parent = self.parent(idx);
        debug_assert!(parent != NIL, "cannot lift root node {idx}");
        match self.side_of(idx) {
            Side::Left => self.rotate_right(parent),
            Side::Right => self.rotate_left(parent),
        }
    }

    /// Number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    pub(crate) fn height(&self) -> usize {
        if self.root == NIL {
            return 0;
        }

        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let node = self.node(idx);
            if node.left != NIL {
                stack.push((node.left, depth + 1));
            }
            if node.right != NIL {
                stack.push((node.right, depth + 1));
            }
        }
        max_depth
    }

    /// Panics unless links, ordering and length are consistent.
    ///
    /// Checks that every child points back at its parent, that no node is
    /// reachable twice, that the in-order keys are strictly ascending and
    /// that the node count matches [`RawTree::len`].
    #[track_caller]
    pub(crate) fn assert_valid(&self)
    where
        K: Ord,
    {
        let mut seen: HashSet<usize, RandomState> =
            HashSet::with_capacity_and_hasher(self.len(), RandomState::default());
        let mut stack: Vec<usize> = Vec::new();

        if self.root != NIL {
            assert_eq!(
                self.node(self.root).parent,
                NIL,
                "root {} has a parent",
                self.root
            );
            stack.push(self.root);
        }

        while let Some(idx) = stack.pop() {
            assert!(seen.insert(idx), "node {idx} is reachable twice");
            let node = self.node(idx);
            for side in [Side::Left, Side::Right] {
                let child = node.child(side);
                if child == NIL {
                    continue;
                }
                assert_eq!(
                    self.node(child).parent,
                    idx,
                    "{side} child {child} of node {idx} does not point back at it"
                );
                stack.push(child);
            }
        }

        assert_eq!(
            seen.len(),
            self.len(),
            "reachable node count differs from the tree length"
        );

        let mut keys = Indices::new(self).map(|idx| self.key(idx));
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key, "in-order keys are not strictly ascending");
                prev = key;
            }
        }
    }
}

impl<K> Default for RawTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn build(keys: &[i32]) -> RawTree<i32> {
        let mut tree = RawTree::new();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    fn in_order(tree: &RawTree<i32>) -> Vec<i32> {
        Indices::new(tree).map(|idx| *tree.key(idx)).collect()
    }

    #[test]
    fn test_insert_and_search() {
        let tree = build(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.len(), 7);
        assert_eq!(*tree.key(tree.root()), 50);
        assert_ne!(tree.search(&40), NIL);
        assert_eq!(tree.search(&45), NIL);
        assert_eq!(tree.get(&60), Some(&60));
        assert_eq!(tree.get(&65), None);
        tree.assert_valid();
    }

    #[test]
    fn test_insert_duplicate_is_ignored() {
        let mut tree = build(&[5, 3, 8]);
        assert!(tree.insert(3).is_none());
        assert_eq!(tree.len(), 3);
        assert_eq!(in_order(&tree), [3, 5, 8]);
    }

    #[test]
    fn test_new_nodes_link_to_parent() {
        let mut tree = build(&[5]);
        let idx = tree.insert(3).unwrap_or(NIL);
        assert_eq!(tree.parent(idx), tree.root());
        assert_eq!(tree.left(tree.root()), idx);
        assert_eq!(tree.color(idx), Color::Red);
        assert_eq!(tree.side_of(idx), Side::Left);
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree = build(&[5, 3, 8]);
        let splice = tree.remove(tree.search(&3));
        assert_eq!(splice.key, 3);
        assert_eq!(splice.replacement, NIL);
        assert_eq!(splice.parent, tree.root());
        assert_eq!(splice.side, Side::Left);
        assert_eq!(splice.promoted, NIL);
        assert_eq!(in_order(&tree), [5, 8]);
        tree.assert_valid();
    }

    #[test]
    fn test_remove_single_child() {
        let mut tree = build(&[5, 3, 8, 9]);
        let eight = tree.search(&8);
        let nine = tree.search(&9);
        let splice = tree.remove(eight);
        assert_eq!(splice.key, 8);
        assert_eq!(splice.replacement, nine);
        assert_eq!(tree.parent(nine), tree.root());
        assert_eq!(splice.side, Side::Right);
        assert_eq!(in_order(&tree), [3, 5, 9]);
        tree.assert_valid();
    }

    #[test]
    fn test_remove_two_children_promotes_predecessor() {
        let mut tree = build(&[50, 30, 70, 20, 40, 60, 80, 35]);
        let thirty = tree.search(&30);
        let splice = tree.remove(thirty);

        assert_eq!(splice.key, 30);
        assert_eq!(splice.promoted, thirty);
        assert_eq!(*tree.key(thirty), 20);
        assert_eq!(tree.left(thirty), NIL);
        assert_eq!(in_order(&tree), [20, 35, 40, 50, 60, 70, 80]);
        tree.assert_valid();
    }

    #[test]
    fn test_remove_root_until_empty() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        while !tree.is_empty() {
            let root = tree.root();
            tree.remove(root);
            tree.assert_valid();
        }
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root_key(), Err(TreeError::Empty));
    }

    #[test]
    fn test_sibling_and_brother() {
        let tree = build(&[10, 5, 15, 3]);
        assert_eq!(tree.sibling(tree.search(&5)), tree.search(&15));
        assert_eq!(tree.sibling(tree.root()), NIL);
        assert_eq!(tree.brother(&15), Ok(Some(&5)));
        assert_eq!(tree.brother(&3), Ok(None));
        assert_eq!(tree.brother(&10), Ok(None));
        assert_eq!(tree.brother(&99), Err(TreeError::KeyNotFound));
        assert_eq!(RawTree::<i32>::new().brother(&1), Err(TreeError::Empty));
    }

    #[test]
    fn test_rotations_preserve_order() {
        let mut tree = build(&[50, 30, 70, 20, 40, 60, 80]);
        let before = in_order(&tree);

        let root = tree.root();
        tree.rotate_left(root);
        assert_eq!(*tree.key(tree.root()), 70);
        assert_eq!(in_order(&tree), before);
        tree.assert_valid();

        tree.rotate_right(tree.root());
        assert_eq!(*tree.key(tree.root()), 50);
        assert_eq!(in_order(&tree), before);
        tree.assert_valid();

        let thirty = tree.search(&30);
        tree.rotate_right(thirty);
        assert_eq!(tree.left(tree.root()), tree.search(&20));
        assert_eq!(in_order(&tree), before);
        tree.assert_valid();
    }

    #[test]
    fn test_lift_reroots_and_keeps_colors() {
        let mut tree = build(&[2, 1, 3]);
        let one = tree.search(&1);
        tree.set_color(one, Color::Black);
        tree.lift(one);
        assert_eq!(tree.root(), one);
        assert_eq!(tree.color(one), Color::Black);
        assert_eq!(in_order(&tree), [1, 2, 3]);
        tree.assert_valid();
    }

    #[test]
    fn test_lift_inner_grandchild() {
        let mut tree = build(&[10, 5, 7]);
        let seven = tree.search(&7);
        let five = tree.search(&5);
        tree.lift(seven);
        assert_eq!(tree.left(tree.root()), seven);
        assert_eq!(tree.left(seven), five);
        assert_eq!(in_order(&tree), [5, 7, 10]);
        tree.assert_valid();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "without a child to lift")]
    fn test_rotate_leaf_is_rejected() {
        let mut tree = build(&[2, 1]);
        let one = tree.search(&1);
        tree.rotate_left(one);
    }

    #[test]
    fn test_height() {
        assert_eq!(RawTree::<i32>::new().height(), 0);
        assert_eq!(build(&[1]).height(), 1);
        assert_eq!(build(&[2, 1, 3]).height(), 2);
        assert_eq!(build(&[1, 2, 3, 4, 5]).height(), 5);
    }

    #[test]
    fn test_min_max_and_root_queries() {
        let tree = build(&[8, 4, 12, 2, 6]);
        assert_eq!(*tree.key(tree.find_minimum(tree.root())), 2);
        assert_eq!(*tree.key(tree.find_maximum(tree.root())), 12);
        assert!(tree.is_root(&8));
        assert!(!tree.is_root(&4));
        assert_eq!(tree.root_key(), Ok(&8));
    }

    #[test]
    fn test_clear_reuses_storage() {
        let mut tree = RawTree::with_capacity(8);
        for key in 0..8 {
            tree.insert(key);
        }
        assert!(tree.capacity() >= 8);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        tree.insert(1);
        tree.assert_valid();
    }

    #[test]
    #[should_panic(expected = "does not point back")]
    fn test_assert_valid_detects_broken_parent_link() {
        let mut tree = build(&[5, 3, 8]);
        let three = tree.search(&3);
        tree.node_mut(three).parent = tree.search(&8);
        tree.assert_valid();
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn test_assert_valid_detects_bad_ordering() {
        let mut tree = build(&[5, 3, 8]);
        let three = tree.search(&3);
        tree.node_mut(three).key = 9;
        tree.assert_valid();
    }
}

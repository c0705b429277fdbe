use core::{borrow::Borrow, fmt};

use crate::{
    Color, Elements, Iter, Nodes, SearchTree, TreeError,
    utils::{NIL, RawTree, Side, Splice},
};

/// A self-balancing binary search tree following the red-black discipline.
///
/// Keys are unique and kept in ascending order. After every insertion and
/// removal the tree restores the red-black properties through recoloring and
/// rotations, which bounds its height by `2 * log2(n + 1)`:
///
/// - The root is black
/// - A red node never has a red parent
/// - Every path from a node to an absent child crosses the same number of black nodes
///
/// The tree also serves as a priority queue: it keeps a reference to its
/// smallest key, which [`RedBlackTree::pull`] removes and hands back.
///
/// Nodes live in an internal arena and refer to each other by index, so
/// rotations only rewrite indices and the parent back-links own nothing.
///
/// # Examples
///
/// ```
/// # use rbpull::RedBlackTree;
/// let mut queue: RedBlackTree<u32> = [7, 3, 18, 10].into_iter().collect();
/// assert_eq!(queue.pull(), Some(3));
/// assert_eq!(queue.pull(), Some(7));
/// assert_eq!(queue.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RedBlackTree<K> {
    /// Node storage and the structural half of every operation
    raw: RawTree<K>,

    /// Index of the leftmost node, NIL when the tree is empty
    first: usize,
}

impl<K> RedBlackTree<K> {
    /// Creates an empty tree
    pub const fn new() -> Self {
        Self {
            raw: RawTree::new(),
            first: NIL,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before reallocating
    ///
    /// # Arguments
    ///
    /// * `capacity` - The number of nodes to preallocate
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawTree::with_capacity(capacity),
            first: NIL,
        }
    }

    /// Returns the number of keys in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of nodes the tree can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of nodes on the longest root-to-leaf path
    ///
    /// # Returns
    ///
    /// * `usize` - The height, `0` for an empty tree
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of black nodes below the root on any path to an absent child
    ///
    /// # Returns
    ///
    /// * `usize` - The black-height of the root, `0` for an empty tree
    pub fn black_height(&self) -> usize {
        let mut black = 0;
        let mut idx = self.raw.left(self.raw.root());
        while idx != NIL {
            if self.raw.color(idx) == Color::Black {
                black += 1;
            }
            idx = self.raw.left(idx);
        }
        black
    }

    /// Returns the key stored at the root
    ///
    /// # Returns
    ///
    /// * `Result<&K, TreeError>` - The root key, or [`TreeError::Empty`] for an empty tree
    pub fn root(&self) -> Result<&K, TreeError> {
        self.raw.root_key()
    }

    /// Returns the smallest key without removing it
    ///
    /// This reads the cached minimum and never walks the tree.
    pub fn peek(&self) -> Option<&K> {
        (self.first != NIL).then(|| self.raw.key(self.first))
    }

    /// Returns the largest key
    pub fn last(&self) -> Option<&K> {
        match self.raw.find_maximum(self.raw.root()) {
            NIL => None,
            idx => Some(self.raw.key(idx)),
        }
    }

    /// Returns a borrowing iterator over the keys in ascending order
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.raw)
    }

    /// Returns an owned snapshot of the keys in ascending order
    ///
    /// The snapshot is independent of the tree: later mutation does not
    /// change it, and cloning it replays the same sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::RedBlackTree;
    /// let mut tree: RedBlackTree<i32> = [5, 1, 3].into_iter().collect();
    /// let snapshot = tree.elements();
    /// tree.insert(2);
    /// assert_eq!(snapshot.collect::<Vec<_>>(), [1, 3, 5]);
    /// ```
    pub fn elements(&self) -> Elements<K>
    where
        K: Clone,
    {
        Elements::snapshot(&self.raw)
    }

    /// Returns an owned snapshot of every node, with its color and neighbours, in key order
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::{Color, RedBlackTree};
    /// let tree: RedBlackTree<i32> = [10, 5, 15, 3].into_iter().collect();
    /// let colors: Vec<(i32, Color)> = tree.nodes().map(|n| (n.key, n.color)).collect();
    /// assert_eq!(
    ///     colors,
    ///     [(3, Color::Red), (5, Color::Black), (10, Color::Black), (15, Color::Black)]
    /// );
    /// ```
    pub fn nodes(&self) -> Nodes<K>
    where
        K: Clone,
    {
        Nodes::snapshot(&self.raw)
    }

    /// Removes every key, keeping the allocated storage
    pub fn clear(&mut self) {
        self.raw.clear();
        self.first = NIL;
    }
}

impl<K: Ord> RedBlackTree<K> {
    /// Inserts a key and rebalances the tree
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the key was added, `false` if an equal key was
    ///   already present, in which case the tree is unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::RedBlackTree;
    /// let mut tree = RedBlackTree::new();
    /// assert!(tree.insert(10));
    /// assert!(tree.insert(5));
    /// assert!(!tree.insert(10));
    /// assert_eq!(tree.root(), Ok(&10));
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let Some(idx) = self.raw.insert(key) else {
            log::debug!("duplicate key ignored");
            return false;
        };

        // A new minimum always lands as the left child of the old one.
        if self.first == NIL || self.raw.left(self.first) == idx {
            self.first = idx;
        }

        self.fix_insertion_violations(idx);
        self.debug_validate();
        true
    }

    /// Removes a key and rebalances the tree
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Returns
    ///
    /// * `Result<K, TreeError>` - The removed key, or [`TreeError::KeyNotFound`]
    ///   if no equal key is stored (the tree is left unchanged)
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::{RedBlackTree, TreeError};
    /// let mut tree: RedBlackTree<i32> = [10, 5, 15].into_iter().collect();
    /// assert_eq!(tree.remove(&5), Ok(5));
    /// assert_eq!(tree.remove(&5), Err(TreeError::KeyNotFound));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.raw.search(key) {
            NIL => Err(TreeError::KeyNotFound),
            idx => Ok(self.remove_node(idx)),
        }
    }

    /// Removes and returns the smallest key
    ///
    /// # Returns
    ///
    /// * `Option<K>` - The smallest key, or `None` if the tree is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::RedBlackTree;
    /// let mut queue: RedBlackTree<i32> = [7, 3, 18, 10, 22, 8, 11, 26].into_iter().collect();
    /// let mut drained = vec![];
    /// while let Some(key) = queue.pull() {
    ///     drained.push(key);
    /// }
    /// assert_eq!(drained, [3, 7, 8, 10, 11, 18, 22, 26]);
    /// assert!(queue.is_empty());
    /// assert_eq!(queue.pull(), None);
    /// ```
    pub fn pull(&mut self) -> Option<K> {
        if self.first == NIL {
            return None;
        }
        Some(self.remove_node(self.first))
    }

    /// Returns `true` if the tree holds the key
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.search(key) != NIL
    }

    /// Returns the stored key equal to `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.get(key)
    }

    /// Returns `true` if `key` is the key stored at the root
    pub fn is_root<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.is_root(key)
    }

    /// Returns the key of the sibling of the node holding `key`
    ///
    /// # Arguments
    ///
    /// * `key` - The key whose sibling is requested
    ///
    /// # Returns
    ///
    /// * `Result<Option<&K>, TreeError>` - The sibling's key, `None` for the
    ///   root or a node without a sibling, [`TreeError::Empty`] for an empty
    ///   tree and [`TreeError::KeyNotFound`] for an absent key
    pub fn brother<Q>(&self, key: &Q) -> Result<Option<&K>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.brother(key)
    }

    /// Returns the color of the node holding `key`
    pub fn color_of<Q>(&self, key: &Q) -> Option<Color>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.raw.search(key) {
            NIL => None,
            idx => Some(self.raw.color(idx)),
        }
    }

    fn remove_node(&mut self, idx: usize) -> K {
        let splice = self.raw.remove(idx);

        if splice.removed == self.first {
            self.first = self.next_first(&splice);
        }

        if splice.color == Color::Black {
            self.fix_removal_violations(splice.replacement, splice.parent, splice.side);
        }

        self.debug_validate();
        splice.key
    }

    /// Locates the new leftmost node after the cached one was unlinked.
    ///
    /// Keys never move between nodes during fixup, so this can be settled
    /// right after the splice.
    fn next_first(&self, splice: &Splice<K>) -> usize {
        if splice.promoted != NIL {
            // The minimum was the promoted predecessor, now held one level up.
            splice.promoted
        } else if splice.replacement != NIL {
            self.raw.find_minimum(splice.replacement)
        } else {
            splice.parent
        }
    }

    /// Climbs from a freshly attached red node, restoring the red-black properties.
    fn fix_insertion_violations(&mut self, mut x: usize) {
        loop {
            let y = self.raw.parent(x);
            if y == NIL {
                self.raw.set_color(x, Color::Black);
                return;
            }
            if self.raw.color(y) == Color::Black {
                return;
            }

            // A red parent is never the root, so the grandparent exists and is black.
            let z = self.raw.parent(y);
            debug_assert!(z != NIL, "red node {y} is the root");
            let t = self.raw.sibling(y);

            if self.raw.color(t) == Color::Red {
                log::trace!("insert case 1: red uncle {t}, recolor under {z}");
                self.raw.set_color(y, Color::Black);
                self.raw.set_color(t, Color::Black);
                self.raw.set_color(z, Color::Red);
                x = z;
                continue;
            }

            if self.raw.side_of(x) != self.raw.side_of(y) {
                log::trace!("insert case 2: inner grandchild {x}, lift over {y}");
                self.raw.lift(x);
                x = y;
                continue;
            }

            log::trace!("insert case 3: outer grandchild {x}, lift {y} over {z}");
            self.raw.lift(y);
            self.raw.swap_colors(y, z);
            return;
        }
    }

    /// Resolves the extra black left on `x`, which hangs on `side` of `z`.
    ///
    /// `x` may be NIL, which is why its parent and side are passed along.
    fn fix_removal_violations(&mut self, mut x: usize, mut z: usize, mut side: Side) {
        loop {
            if self.raw.color(x) == Color::Red {
                log::trace!("remove: red replacement {x} turns black");
                self.raw.set_color(x, Color::Black);
                return;
            }
            if z == NIL {
                // The extra black reached the root and is dropped.
                return;
            }

            let y = self.raw.child(z, side.opposite());
            debug_assert!(y != NIL, "double black node below {z} has no sibling");

            if self.raw.color(y) == Color::Red {
                debug_assert_eq!(self.raw.color(z), Color::Black);
                log::trace!("remove case 1: red sibling {y}, lift over {z}");
                self.raw.set_color(z, Color::Red);
                self.raw.set_color(y, Color::Black);
                self.raw.lift(y);
                continue;
            }

            let near = self.raw.child(y, side);
            let far = self.raw.child(y, side.opposite());

            if self.raw.color(near) == Color::Black && self.raw.color(far) == Color::Black {
                self.raw.set_color(y, Color::Red);
                if self.raw.color(z) == Color::Red {
                    log::trace!("remove case 3: black nephews, red parent {z}");
                    self.raw.set_color(z, Color::Black);
                    return;
                }
                log::trace!("remove case 2: black nephews, black parent {z}");
                if z == self.raw.root() {
                    return;
                }
                x = z;
                z = self.raw.parent(x);
                side = self.raw.side_of(x);
                continue;
            }

            if self.raw.color(far) == Color::Black {
                log::trace!("remove case 4: red near nephew {near}, lift over {y}");
                self.raw.set_color(near, Color::Black);
                self.raw.set_color(y, Color::Red);
                self.raw.lift(near);
                continue;
            }

            log::trace!("remove case 5: red far nephew {far}, lift {y} over {z}");
            let parent_color = self.raw.color(z);
            self.raw.lift(y);
            self.raw.set_color(y, parent_color);
            self.raw.set_color(z, Color::Black);
            self.raw.set_color(far, Color::Black);
            return;
        }
    }

    #[inline]
    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        self.assert_valid();
    }

    /// Panics unless the tree satisfies every structural and red-black invariant
    ///
    /// Checks parent/child link symmetry, strict key ordering, the node count,
    /// a black root, the absence of red-red edges, uniform black-height and the
    /// cached minimum. Debug builds run this after every mutation.
    #[track_caller]
    pub fn assert_valid(&self) {
        self.raw.assert_valid();

        let root = self.raw.root();
        assert_eq!(self.raw.color(root), Color::Black, "root is not black");
        self.verify_black_height(root);

        assert_eq!(
            self.first,
            self.raw.find_minimum(root),
            "cached minimum is not the leftmost node"
        );
    }

    /// Returns the black-height of `idx` counting the absent children, panicking on violations.
    #[track_caller]
    fn verify_black_height(&self, idx: usize) -> usize {
        if idx == NIL {
            return 1;
        }

        let node = self.raw.node(idx);
        if node.color == Color::Red {
            assert!(
                self.raw.color(node.left) == Color::Black
                    && self.raw.color(node.right) == Color::Black,
                "red node {idx} has a red child"
            );
        }

        let left_height = self.verify_black_height(node.left);
        let right_height = self.verify_black_height(node.right);
        assert_eq!(
            left_height, right_height,
            "black-height differs below node {idx}"
        );

        match node.color {
            Color::Black => left_height + 1,
            Color::Red => left_height,
        }
    }
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for RedBlackTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RedBlackTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a RedBlackTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Ord> SearchTree<K> for RedBlackTree<K> {
    fn insert(&mut self, key: K) -> bool {
        RedBlackTree::insert(self, key)
    }

    fn remove(&mut self, key: &K) -> Result<K, TreeError> {
        RedBlackTree::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        RedBlackTree::contains(self, key)
    }

    fn len(&self) -> usize {
        RedBlackTree::len(self)
    }

    fn height(&self) -> usize {
        RedBlackTree::height(self)
    }

    fn root(&self) -> Result<&K, TreeError> {
        RedBlackTree::root(self)
    }

    fn elements(&self) -> Elements<K>
    where
        K: Clone,
    {
        RedBlackTree::elements(self)
    }
}

/// Diagnostic dump, one `key(COLOR)` line per node in key order. Not a stable format.
impl<K: fmt::Display> fmt::Display for RedBlackTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, idx) in crate::iter::Indices::new(&self.raw).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}({})", self.raw.key(idx), self.raw.color(idx))?;
        }
        Ok(())
    }
}

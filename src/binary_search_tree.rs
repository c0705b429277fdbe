use core::{borrow::Borrow, fmt};

use crate::{
    Elements, Iter, SearchTree, TreeError,
    utils::{NIL, RawTree},
};

/// A plain binary search tree that never rebalances.
///
/// It shares its structural insert and delete with [`RedBlackTree`](crate::RedBlackTree)
/// but skips every fixup, so its height depends on insertion order: ascending
/// input degrades it into a list. Useful as a baseline next to the balanced tree.
///
/// # Examples
///
/// ```
/// # use rbpull::BinarySearchTree;
/// let mut tree = BinarySearchTree::new();
/// for key in 1..=5 {
///     tree.insert(key);
/// }
/// assert_eq!(tree.height(), 5);
/// assert_eq!(tree.root(), Ok(&1));
/// ```
#[derive(Debug, Clone)]
pub struct BinarySearchTree<K> {
    raw: RawTree<K>,
}

impl<K> BinarySearchTree<K> {
    /// Creates an empty tree
    pub const fn new() -> Self {
        Self {
            raw: RawTree::new(),
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawTree::with_capacity(capacity),
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

    /// Returns the number of nodes on the longest root-to-leaf path, `0` when empty
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the key stored at the root, or [`TreeError::Empty`]
    pub fn root(&self) -> Result<&K, TreeError> {
        self.raw.root_key()
    }

    /// Returns the smallest key
    pub fn first(&self) -> Option<&K> {
        match self.raw.find_minimum(self.raw.root()) {
            NIL => None,
            idx => Some(self.raw.key(idx)),
        }
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
    pub fn elements(&self) -> Elements<K>
    where
        K: Clone,
    {
        Elements::snapshot(&self.raw)
    }

    /// Removes every key, keeping the allocated storage
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord> BinarySearchTree<K> {
    /// Inserts a key, returning `false` if an equal key is already present
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key).is_some()
    }

    /// Removes a key, returning it or [`TreeError::KeyNotFound`]
    ///
    /// A node with two children takes over its in-order predecessor's key and
    /// the predecessor's node is unlinked instead.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.raw.search(key) {
            NIL => Err(TreeError::KeyNotFound),
            idx => Ok(self.raw.remove(idx).key),
        }
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
    /// See [`RedBlackTree::brother`](crate::RedBlackTree::brother) for the error cases.
    pub fn brother<Q>(&self, key: &Q) -> Result<Option<&K>, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.brother(key)
    }

    /// Panics unless parent links, key ordering and length are consistent
    #[track_caller]
    pub fn assert_valid(&self) {
        self.raw.assert_valid();
    }
}

impl<K> Default for BinarySearchTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for BinarySearchTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for BinarySearchTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a BinarySearchTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Ord> SearchTree<K> for BinarySearchTree<K> {
    fn insert(&mut self, key: K) -> bool {
        BinarySearchTree::insert(self, key)
    }

    fn remove(&mut self, key: &K) -> Result<K, TreeError> {
        BinarySearchTree::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BinarySearchTree::contains(self, key)
    }

    fn len(&self) -> usize {
        BinarySearchTree::len(self)
    }

    fn height(&self) -> usize {
        BinarySearchTree::height(self)
    }

    fn root(&self) -> Result<&K, TreeError> {
        BinarySearchTree::root(self)
    }

    fn elements(&self) -> Elements<K>
    where
        K: Clone,
    {
        BinarySearchTree::elements(self)
    }
}

/// Diagnostic dump, one `key: left|right` line per node in key order.
impl<K: fmt::Display> fmt::Display for BinarySearchTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = |idx: usize, f: &mut fmt::Formatter<'_>| match idx {
            NIL => f.write_str("-"),
            idx => write!(f, "{}", self.raw.key(idx)),
        };

        for (i, idx) in crate::iter::Indices::new(&self.raw).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: ", self.raw.key(idx))?;
            slot(self.raw.left(idx), f)?;
            f.write_str("|")?;
            slot(self.raw.right(idx), f)?;
        }
        Ok(())
    }
}

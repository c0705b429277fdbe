use crate::{Elements, TreeError};

/// Ordered search tree trait shared by the balanced and unbalanced trees
///
/// This trait captures the operations every binary search tree in this crate
/// supports, regardless of whether it rebalances itself after mutation. Code
/// that only needs ordered set semantics can be written once against it and
/// run over either [`RedBlackTree`](crate::RedBlackTree) or
/// [`BinarySearchTree`](crate::BinarySearchTree).
pub trait SearchTree<K: Ord> {
    /// Inserts a key into the tree
    ///
    /// Inserting a key that is already present is a no-op: the tree keeps its
    /// shape and the original key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the key was added, `false` if it was already present
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::{RedBlackTree, SearchTree};
    /// let mut tree = RedBlackTree::new();
    /// assert!(SearchTree::insert(&mut tree, 4));
    /// assert!(!SearchTree::insert(&mut tree, 4));
    /// assert_eq!(SearchTree::len(&tree), 1);
    /// ```
    fn insert(&mut self, key: K) -> bool;

    /// Removes a key from the tree
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Returns
    ///
    /// * `Result<K, TreeError>` - The removed key, or [`TreeError::KeyNotFound`]
    ///   if the key is absent (the tree is left unchanged)
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::{BinarySearchTree, SearchTree, TreeError};
    /// let mut tree: BinarySearchTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(SearchTree::remove(&mut tree, &1), Ok(1));
    /// assert_eq!(SearchTree::remove(&mut tree, &1), Err(TreeError::KeyNotFound));
    /// ```
    fn remove(&mut self, key: &K) -> Result<K, TreeError>;

    /// Returns `true` if the tree holds the key
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of keys in the tree
    fn len(&self) -> usize;

    /// Returns `true` if the tree holds no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of nodes on the longest root-to-leaf path
    ///
    /// # Returns
    ///
    /// * `usize` - The height of the tree, `0` when empty
    fn height(&self) -> usize;

    /// Returns the key stored at the root
    ///
    /// # Returns
    ///
    /// * `Result<&K, TreeError>` - The root key, or [`TreeError::Empty`] for an empty tree
    fn root(&self) -> Result<&K, TreeError>;

    /// Returns an owned, ascending snapshot of all keys
    ///
    /// # Examples
    ///
    /// ```
    /// # use rbpull::{RedBlackTree, SearchTree};
    /// let tree: RedBlackTree<u8> = [9, 2, 5].into_iter().collect();
    /// let keys: Vec<u8> = SearchTree::elements(&tree).collect();
    /// assert_eq!(keys, [2, 5, 9]);
    /// ```
    fn elements(&self) -> Elements<K>
    where
        K: Clone;
}

use core::fmt;

/// Sentinel index standing in for an absent child or parent.
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to its absent children cross the same number of black nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node - must have black children, cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("RED"),
            Color::Black => f.write_str("BLACK"),
        }
    }
}

/// Which child slot of a parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A node in the search tree containing its key and structural links.
///
/// Links are indices into the owning arena; `NIL` marks an absent relative.
/// The parent link is a plain index and owns nothing.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The stored key, also the sort key
    pub(crate) key: K,

    /// Index of parent node (NIL if this is root)
    pub(crate) parent: usize,

    /// Index of left child node (NIL if no left child)
    pub(crate) left: usize,

    /// Index of right child node (NIL if no right child)
    pub(crate) right: usize,

    /// Color of this node, ignored by the unbalanced tree
    pub(crate) color: Color,
}

impl<K> Node<K> {
    /// Creates a detached red leaf
    #[inline]
    pub(crate) const fn new(key: K, parent: usize) -> Self {
        Self {
            key,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, idx: usize) {
        match side {
            Side::Left => self.left = idx,
            Side::Right => self.right = idx,
        }
    }
}

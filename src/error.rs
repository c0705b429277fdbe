use core::fmt;

/// Error type returned by fallible tree operations.
///
/// Every error is a precondition failure checked before the tree is touched,
/// so a returned error always means the tree is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// The operation needs at least one element but the tree is empty.
    Empty,
    /// The requested key is not stored in the tree.
    KeyNotFound,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Empty => write!(f, "tree is empty"),
            TreeError::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl core::error::Error for TreeError {}

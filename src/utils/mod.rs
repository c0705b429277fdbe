mod arena;

mod node;
pub use node::Color;
pub(crate) use node::{NIL, Side};

mod raw_tree;
pub(crate) use raw_tree::{RawTree, Splice};

#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

#[macro_use]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod utils;
pub use utils::Color;

mod error;
pub use error::TreeError;

mod iter;
pub use iter::{Elements, Iter, NodeEntry, Nodes};

mod traits;
pub use traits::SearchTree;

mod red_black_tree;
pub use red_black_tree::RedBlackTree;

mod binary_search_tree;
pub use binary_search_tree::BinarySearchTree;

mod search_tree;
pub use search_tree::SearchTree;

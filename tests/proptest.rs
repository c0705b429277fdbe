use std::collections::BTreeSet;

use proptest::prelude::*;
use rbpull::{BinarySearchTree, RedBlackTree, TreeError};

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    Remove(i16),
    Pull,
}

fn ops(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            4 => any::<i16>().prop_map(|k| Op::Insert(k % 512)),
            2 => any::<i16>().prop_map(|k| Op::Remove(k % 512)),
            1 => Just(Op::Pull),
        ],
        len,
    )
}

fn within_height_bound(tree: &RedBlackTree<i16>) -> bool {
    (1u128 << tree.height()) <= (tree.len() as u128 + 1).pow(2)
}

proptest! {
    #[test]
    fn insert_random(input in proptest::collection::vec(any::<i32>(), 0..750)) {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();

        for key in input.iter().copied() {
            prop_assert_eq!(tree.insert(key), model.insert(key));
            tree.assert_valid();
        }

        prop_assert_eq!(tree.len(), model.len());
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(tree.peek(), model.first());
        prop_assert_eq!(tree.last(), model.last());
    }

    #[test]
    fn mixed_operations(input in ops(1..600)) {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();

        for op in input {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(tree.insert(key), model.insert(key));
                }
                Op::Remove(key) => {
                    let expected = if model.remove(&key) {
                        Ok(key)
                    } else {
                        Err(TreeError::KeyNotFound)
                    };
                    prop_assert_eq!(tree.remove(&key), expected);
                }
                Op::Pull => {
                    prop_assert_eq!(tree.pull(), model.pop_first());
                }
            }

            tree.assert_valid();
            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(tree.peek(), model.first());
            prop_assert!(within_height_bound(&tree));
        }

        prop_assert_eq!(tree.elements().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn pull_drains_in_order(input in proptest::collection::vec(any::<u32>(), 0..500)) {
        let mut tree: RedBlackTree<u32> = input.iter().copied().collect();
        let expected: Vec<u32> = input.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        let mut drained = Vec::with_capacity(expected.len());
        while let Some(key) = tree.pull() {
            drained.push(key);
        }

        prop_assert_eq!(drained, expected);
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.root(), Err(TreeError::Empty));
    }

    #[test]
    fn unbalanced_tree_matches_model(input in ops(1..400)) {
        let mut tree = BinarySearchTree::new();
        let mut model = BTreeSet::new();

        for op in input {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(tree.insert(key), model.insert(key));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(tree.remove(&key).is_ok(), model.remove(&key));
                }
                Op::Pull => {
                    if let Some(&min) = tree.first() {
                        prop_assert_eq!(tree.remove(&min), Ok(min));
                        prop_assert_eq!(model.pop_first(), Some(min));
                    }
                }
            }

            tree.assert_valid();
            prop_assert!(tree.height() <= tree.len());
        }

        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }
}

use alloc::vec::Vec;
use core::mem;

use super::node::Node;

/// Slab of tree nodes addressed by stable indices.
///
/// Vacated slots are recycled through a LIFO free list so that a tree under
/// steady insert/remove churn stops allocating once it reaches its working size.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K> {
    /// Node slots, `None` when vacant
    slots: Vec<Option<Node<K>>>,

    /// Stack of vacant slot indices, the top is reused first
    free_list: Vec<usize>,
}

impl<K> Arena<K> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Number of occupied slots
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Number of nodes the arena can hold without reallocating
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn alloc(&mut self, node: Node<K>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none(), "free slot {idx} is occupied");
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Vacates a slot and hands back the node it held.
    pub(crate) fn free(&mut self, idx: usize) -> Node<K> {
        match self.slots.get_mut(idx).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => panic!("double free of node slot {idx}"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> &Node<K> {
        match self.slots.get(idx) {
            Some(Some(node)) => node,
            _ => panic!("access to vacant node slot {idx}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut Node<K> {
        match self.slots.get_mut(idx) {
            Some(Some(node)) => node,
            _ => panic!("access to vacant node slot {idx}"),
        }
    }

    /// Exchanges the keys of two occupied slots, leaving their links in place.
    pub(crate) fn swap_keys(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head.get_mut(lo), tail.first_mut()) {
            (Some(Some(x)), Some(Some(y))) => mem::swap(&mut x.key, &mut y.key),
            _ => panic!("key swap between vacant node slots {a} and {b}"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::node::NIL;

    #[test]
    fn test_arena_reuses_freed_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, NIL));
        let b = arena.alloc(Node::new(2, NIL));
        assert_eq!(arena.len(), 2);

        let freed = arena.free(a);
        assert_eq!(freed.key, 1);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(Node::new(3, NIL));
        assert_eq!(c, a);
        assert_eq!(arena.get(c).key, 3);
        assert_eq!(arena.get(b).key, 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_arena_swap_keys() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new("a", NIL));
        let b = arena.alloc(Node::new("b", NIL));
        arena.get_mut(b).left = a;
        arena.swap_keys(b, a);
        assert_eq!(arena.get(a).key, "b");
        assert_eq!(arena.get(b).key, "a");
        assert_eq!(arena.get(b).left, a);
        arena.swap_keys(a, a);
        assert_eq!(arena.get(a).key, "b");
    }

    #[test]
    fn test_arena_with_capacity() {
        let arena = Arena::<u32>::with_capacity(16);
        assert!(arena.capacity() >= 16);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_arena_clear() {
        let mut arena = Arena::new();
        for i in 0..4 {
            arena.alloc(Node::new(i, NIL));
        }
        arena.free(1);
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.alloc(Node::new(9, NIL)), 0);
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn test_arena_double_free() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, NIL));
        arena.free(a);
        arena.free(a);
    }

    #[test]
    #[should_panic(expected = "vacant node slot")]
    fn test_arena_vacant_access() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1, NIL));
        arena.free(a);
        let _ = arena.get(a);
    }
}

use crate::arena::Handle;
use std::cell::Cell;

/// A struct representing an internal node of a treap.
///
/// The right link is a `Cell` because in-order traversal temporarily threads it back to the
/// node's in-order successor.
#[derive(Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub priority: u32,
    pub left: Option<Handle>,
    pub right: Cell<Option<Handle>>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, priority: u32) -> Self {
        Node {
            key,
            value,
            priority,
            left: None,
            right: Cell::new(None),
        }
    }
}

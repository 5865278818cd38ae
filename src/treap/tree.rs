use crate::arena::{Handle, TypedArena};
use crate::comparator::Comparator;
use crate::treap::node::Node;
use std::cell::Cell;
use std::cmp::Ordering;
use std::mem;

const ARENA_CHUNK_SIZE: usize = 256;

/// A location that holds a subtree: the root slot, or a child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Link {
    Root,
    Left(Handle),
    Right(Handle),
}

/// The node storage and root of a treap. Priorities form a min-heap.
///
/// In-order walks thread right links back to in-order successors. The position of the walk is
/// kept in `cursor` rather than in the iterator, so a walk whose iterator was leaked can still be
/// run to completion by `restore`. Every other operation calls `restore` first and therefore
/// only ever sees an unthreaded tree.
pub struct Tree<K, V> {
    pub root: Option<Handle>,
    pub nodes: TypedArena<Node<K, V>>,
    cursor: Cell<Option<Handle>>,
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Tree {
            root: None,
            nodes: TypedArena::new(ARENA_CHUNK_SIZE),
            cursor: Cell::new(None),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.cursor.set(None);
    }

    /// Begins a threaded in-order walk from the smallest key.
    pub fn start_walk(&self) {
        self.restore();
        self.cursor.set(self.root);
    }

    /// Advances the current walk and returns the next node in ascending order. The thread into a
    /// node is removed before that node is returned, so a finished walk leaves no threads behind.
    pub fn step(&self) -> Option<Handle> {
        while let Some(curr) = self.cursor.get() {
            let node = &self.nodes[curr];
            let left = match node.left {
                Some(left) => left,
                None => {
                    self.cursor.set(node.right.get());
                    return Some(curr);
                },
            };

            let mut pred = left;
            while let Some(right) = self.nodes[pred].right.get() {
                if right == curr {
                    break;
                }
                pred = right;
            }

            if self.nodes[pred].right.get() == Some(curr) {
                self.nodes[pred].right.set(None);
                self.cursor.set(node.right.get());
                return Some(curr);
            }

            self.nodes[pred].right.set(Some(curr));
            self.cursor.set(Some(left));
        }
        None
    }

    /// Finishes any walk in progress.
    pub fn restore(&self) {
        if self.cursor.get().is_some() {
            while self.step().is_some() {}
        }
    }

    fn get_link(&self, link: Link) -> Option<Handle> {
        match link {
            Link::Root => self.root,
            Link::Left(handle) => self.nodes[handle].left,
            Link::Right(handle) => self.nodes[handle].right.get(),
        }
    }

    fn set_link(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(handle) => self.nodes[handle].left = child,
            Link::Right(handle) => self.nodes[handle].right.set(child),
        }
    }

    // Lifts the right child of `handle` into its place and returns the child.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let child = match self.nodes[handle].right.get() {
            Some(child) => child,
            None => unreachable!(),
        };
        let inner = self.nodes[child].left.take();
        self.nodes[handle].right.set(inner);
        self.nodes[child].left = Some(handle);
        child
    }

    // Lifts the left child of `handle` into its place and returns the child.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let child = match self.nodes[handle].left {
            Some(child) => child,
            None => unreachable!(),
        };
        let inner = self.nodes[child].right.replace(Some(handle));
        self.nodes[handle].left = inner;
        child
    }

    pub fn insert<C>(&mut self, comparator: &C, new_node: Node<K, V>) -> Option<V>
    where C: Comparator<K> {
        self.restore();
        let mut path = Vec::new();
        let mut link = Link::Root;
        while let Some(handle) = self.get_link(link) {
            path.push(link);
            link = match comparator.compare(&new_node.key, &self.nodes[handle].key) {
                Ordering::Less => Link::Left(handle),
                Ordering::Greater => Link::Right(handle),
                Ordering::Equal => {
                    return Some(mem::replace(&mut self.nodes[handle].value, new_node.value));
                },
            };
        }

        let handle = self.nodes.allocate(new_node);
        self.set_link(link, Some(handle));

        // Only the new node can violate the heap property, so rotate it up until it does not.
        while let Some(parent_link) = path.pop() {
            let parent = match link {
                Link::Left(parent) | Link::Right(parent) => parent,
                Link::Root => unreachable!(),
            };
            if self.nodes[handle].priority >= self.nodes[parent].priority {
                break;
            }
            let top = match link {
                Link::Left(_) => self.rotate_right(parent),
                _ => self.rotate_left(parent),
            };
            self.set_link(parent_link, Some(top));
            link = parent_link;
        }
        None
    }

    // Rotates the node at `link` down towards the child with the smaller priority until it has
    // at most one child, then replaces it with that child.
    fn delete_root(&mut self, mut link: Link, handle: Handle) {
        loop {
            match (self.nodes[handle].left, self.nodes[handle].right.get()) {
                (Some(left), Some(right)) => {
                    if self.nodes[left].priority < self.nodes[right].priority {
                        let top = self.rotate_right(handle);
                        self.set_link(link, Some(top));
                        link = Link::Right(top);
                    } else {
                        let top = self.rotate_left(handle);
                        self.set_link(link, Some(top));
                        link = Link::Left(top);
                    }
                },
                (child, None) | (None, child) => {
                    self.set_link(link, child);
                    return;
                },
            }
        }
    }

    pub fn remove<C>(&mut self, comparator: &C, key: &K) -> Option<Node<K, V>>
    where C: Comparator<K> {
        self.restore();
        let mut link = Link::Root;
        let handle = loop {
            let handle = self.get_link(link)?;
            link = match comparator.compare(key, &self.nodes[handle].key) {
                Ordering::Less => Link::Left(handle),
                Ordering::Greater => Link::Right(handle),
                Ordering::Equal => break handle,
            };
        };
        self.delete_root(link, handle);
        Some(self.nodes.free(handle))
    }

    // The leftmost node never has a left child, so it is spliced out without rotations.
    pub fn remove_min(&mut self) -> Option<Node<K, V>> {
        self.restore();
        let mut link = Link::Root;
        let mut handle = self.get_link(link)?;
        while let Some(left) = self.nodes[handle].left {
            link = Link::Left(handle);
            handle = left;
        }
        let right = self.nodes[handle].right.get();
        self.set_link(link, right);
        Some(self.nodes.free(handle))
    }

    pub fn remove_max(&mut self) -> Option<Node<K, V>> {
        self.restore();
        let mut link = Link::Root;
        let mut handle = self.get_link(link)?;
        while let Some(right) = self.nodes[handle].right.get() {
            link = Link::Right(handle);
            handle = right;
        }
        let left = self.nodes[handle].left;
        self.set_link(link, left);
        Some(self.nodes.free(handle))
    }

    pub fn find<C>(&self, comparator: &C, key: &K) -> Option<Handle>
    where C: Comparator<K> {
        self.restore();
        let mut curr = self.root;
        while let Some(handle) = curr {
            curr = match comparator.compare(key, &self.nodes[handle].key) {
                Ordering::Less => self.nodes[handle].left,
                Ordering::Greater => self.nodes[handle].right.get(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub fn min(&self) -> Option<Handle> {
        self.restore();
        let mut handle = self.root?;
        while let Some(left) = self.nodes[handle].left {
            handle = left;
        }
        Some(handle)
    }

    pub fn max(&self) -> Option<Handle> {
        self.restore();
        let mut handle = self.root?;
        while let Some(right) = self.nodes[handle].right.get() {
            handle = right;
        }
        Some(handle)
    }
}

impl<K, V> Clone for Tree<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        self.restore();
        Tree {
            root: self.root,
            nodes: self.nodes.clone(),
            cursor: Cell::new(None),
        }
    }
}

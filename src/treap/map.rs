use crate::arena::Handle;
use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::treap::node::Node;
use crate::treap::tree::Tree;
use log::debug;
use rand::Rng;
use rand::XorShiftRng;
use std::fmt;
use std::ops::{Index, IndexMut};

/// An ordered map implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a key, a value, and a priority. The key of any node is greater than all keys in its
/// left subtree and less than all keys occurring in its right subtree. The priority of a node is
/// less than or equal to the priority of all nodes in its subtrees. By randomly generating
/// priorities, the expected height of the tree is proportional to the logarithm of the number of
/// keys.
///
/// Cloning a `TreapMap` produces a fully independent copy with the same shape.
///
/// # Examples
///
/// ```
/// use randomized_collections::treap::TreapMap;
///
/// let mut map = TreapMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Ok((&0, &1)));
/// assert_eq!(map.max(), Ok((&3, &4)));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
#[derive(Clone)]
pub struct TreapMap<K, V, C = Natural> {
    tree: Tree<K, V>,
    comparator: C,
    rng: XorShiftRng,
}

impl<K, V> TreapMap<K, V>
where K: Ord
{
    /// Constructs a new, empty `TreapMap<K, V>` ordered by `K`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let map: TreapMap<u32, u32> = TreapMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Constructs a new, empty `TreapMap<K, V>` that draws node priorities from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    /// use rand::{SeedableRng, XorShiftRng};
    ///
    /// let rng = XorShiftRng::from_seed([1, 2, 3, 4]);
    /// let map: TreapMap<u32, u32> = TreapMap::with_rng(rng);
    /// ```
    pub fn with_rng(rng: XorShiftRng) -> Self {
        Self::with_comparator_and_rng(Natural, rng)
    }
}

impl<K, V, C> TreapMap<K, V, C>
where C: Comparator<K>
{
    /// Constructs a new, empty `TreapMap<K, V, C>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// map.insert(1, 0);
    /// map.insert(2, 0);
    /// assert_eq!(map.min(), Ok((&2, &0)));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_rng(comparator, XorShiftRng::new_unseeded())
    }

    /// Constructs a new, empty `TreapMap<K, V, C>` ordered by `comparator` that draws node
    /// priorities from `rng`.
    pub fn with_comparator_and_rng(comparator: C, rng: XorShiftRng) -> Self {
        TreapMap {
            tree: Tree::new(),
            comparator,
            rng,
        }
    }

    fn entry(&self, handle: Handle) -> (&K, &V) {
        let node = &self.tree.nodes[handle];
        (&node.key, &node.value)
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, its value is
    /// replaced in place and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let TreapMap {
            ref mut tree,
            ref comparator,
            ref mut rng,
        } = self;
        tree.insert(comparator, Node::new(key, value, rng.next_u32()))
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None` and leave the map unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let TreapMap {
            ref mut tree,
            ref comparator,
            ..
        } = self;
        tree.remove(comparator, key).map(|node| (node.key, node.value))
    }

    /// Removes and returns the entry with the minimum key, or `Error::EmptyContainer` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    /// use randomized_collections::Error;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.remove_min(), Ok((1, 1)));
    /// assert_eq!(map.remove_min(), Ok((3, 3)));
    /// assert_eq!(map.remove_min(), Err(Error::EmptyContainer));
    /// ```
    pub fn remove_min(&mut self) -> Result<(K, V)> {
        self.tree
            .remove_min()
            .map(|node| (node.key, node.value))
            .ok_or(Error::EmptyContainer)
    }

    /// Removes and returns the entry with the maximum key, or `Error::EmptyContainer` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.remove_max(), Ok((3, 3)));
    /// ```
    pub fn remove_max(&mut self) -> Result<(K, V)> {
        self.tree
            .remove_max()
            .map(|node| (node.key, node.value))
            .ok_or(Error::EmptyContainer)
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.find(&self.comparator, key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree
            .find(&self.comparator, key)
            .map(|handle| &self.tree.nodes[handle].value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.tree.find(&self.comparator, key) {
            Some(handle) => Some(&mut self.tree.nodes[handle].value),
            None => None,
        }
    }

    /// Returns the value associated with a particular key, or `Error::KeyNotFound` if the key
    /// does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    /// use randomized_collections::Error;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.lookup(&1), Ok(&"a"));
    /// assert_eq!(map.lookup(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the entry with the minimum key, or `Error::EmptyContainer` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    /// use randomized_collections::Error;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.min(), Err(Error::EmptyContainer));
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.min(), Ok((&1, &"a")));
    /// ```
    pub fn min(&self) -> Result<(&K, &V)> {
        self.tree
            .min()
            .map(|handle| self.entry(handle))
            .ok_or(Error::EmptyContainer)
    }

    /// Returns the entry with the maximum key, or `Error::EmptyContainer` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.max(), Ok((&2, &"b")));
    /// ```
    pub fn max(&self) -> Result<(&K, &V)> {
        self.tree
            .max()
            .map(|handle| self.entry(handle))
            .ok_or(Error::EmptyContainer)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.insert(1, 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, 1);
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing treap with {} entries", self.tree.len());
        self.tree.clear();
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs in ascending
    /// order.
    ///
    /// The traversal uses constant extra space by temporarily threading right links of the tree
    /// back to in-order successors, so it borrows the map mutably even though it only yields
    /// immutable references. Every thread is removed by the time the iterator is exhausted or
    /// dropped. If the iterator is leaked instead, the next operation on the map finishes the
    /// traversal before doing anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::treap::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(2, 2);
    /// map.insert(1, 1);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&mut self) -> TreapMapIter<K, V> {
        self.tree.start_walk();
        TreapMapIter { tree: &self.tree }
    }
}

impl<K, V, C> IntoIterator for TreapMap<K, V, C>
where C: Comparator<K>
{
    type Item = (K, V);
    type IntoIter = TreapMapIntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        TreapMapIntoIter { tree: self.tree }
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut TreapMap<K, V, C>
where C: Comparator<K>
{
    type Item = (&'a K, &'a V);
    type IntoIter = TreapMapIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapMap<K, V, C>`.
///
/// This iterator traverses the elements of a map in ascending order and yields owned entries.
pub struct TreapMapIntoIter<K, V> {
    tree: Tree<K, V>,
}

impl<K, V> Iterator for TreapMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.remove_min().map(|node| (node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V> ExactSizeIterator for TreapMapIntoIter<K, V> {}

/// An iterator for `TreapMap<K, V, C>`.
///
/// This iterator performs a Morris traversal, yielding immutable references to key-value pairs in
/// ascending order.
pub struct TreapMapIter<'a, K, V> {
    tree: &'a Tree<K, V>,
}

impl<'a, K, V> Iterator for TreapMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        tree.step().map(|handle| {
            let node = &tree.nodes[handle];
            (&node.key, &node.value)
        })
    }
}

impl<'a, K, V> Drop for TreapMapIter<'a, K, V> {
    fn drop(&mut self) {
        self.tree.restore();
    }
}

impl<K, V> Default for TreapMap<K, V>
where K: Ord
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> fmt::Debug for TreapMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    // Walks with an explicit stack so the tree stays unthreaded while entries are formatted.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.tree.restore();
        let mut entries = f.debug_map();
        let mut stack = Vec::new();
        let mut curr = self.tree.root;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.tree.nodes[handle].left;
            }
            match stack.pop() {
                Some(handle) => {
                    let node = &self.tree.nodes[handle];
                    entries.entry(&node.key, &node.value);
                    curr = node.right.get();
                },
                None => return entries.finish(),
            }
        }
    }
}

impl<'a, K, V, C> Index<&'a K> for TreapMap<K, V, C>
where C: Comparator<K>
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("Key does not exist.")
    }
}

impl<'a, K, V, C> IndexMut<&'a K> for TreapMap<K, V, C>
where C: Comparator<K>
{
    fn index_mut(&mut self, key: &K) -> &mut Self::Output {
        self.get_mut(key).expect("Key does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::TreapMap;
    use crate::arena::Handle;
    use crate::error::Error;
    use crate::treap::tree::tests::check_tree;
    use rand::{Rng, SeedableRng, XorShiftRng};
    use std::cell::RefCell;
    use std::fmt;
    use std::mem;
    use std::rc::Rc;

    fn half_iterated(consumed: usize) -> TreapMap<u32, u32> {
        let mut map = TreapMap::new();
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            map.insert(*key, key * 10);
        }
        {
            let mut iter = map.iter();
            for _ in 0..consumed {
                assert!(iter.next().is_some());
            }
            mem::forget(iter);
        }
        map
    }

    fn keys(map: &mut TreapMap<u32, u32>) -> Vec<u32> {
        map.iter().map(|(key, _)| *key).collect()
    }

    // A leftover thread creates a cycle, so a walk over every link visits too many nodes.
    fn has_threads<K, V, C>(map: &TreapMap<K, V, C>) -> bool {
        let mut stack = map.tree.root.into_iter().collect::<Vec<Handle>>();
        let mut seen = 0;
        while let Some(handle) = stack.pop() {
            seen += 1;
            if seen > map.tree.len() {
                return true;
            }
            let node = &map.tree.nodes[handle];
            stack.extend(node.left);
            stack.extend(node.right.get());
        }
        false
    }

    #[test]
    fn test_len_empty() {
        let map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut map = TreapMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = TreapMap::new();
        assert_eq!(map.insert(3, "a"), None);
        assert_eq!(map.insert(3, "b"), Some("a"));
        assert_eq!(map.lookup(&3), Ok(&"b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert_eq!(map.remove(&1), None);
        assert!(!map.contains_key(&1));
        assert_eq!(map.len(), 1);
        check_tree(&map.tree);
    }

    #[test]
    fn test_remove_min_then_min() {
        let mut map = TreapMap::new();
        for key in &[10, 20, 5, 15, 25] {
            map.insert(*key, key * 2);
        }
        assert_eq!(map.remove_min(), Ok((5, 10)));
        assert_eq!(map.min(), Ok((&10, &20)));
        assert_eq!(map.remove_max(), Ok((25, 50)));
        assert_eq!(map.max(), Ok((&20, &40)));
        assert!(!map.contains_key(&5));
        assert!(!map.contains_key(&25));
        check_tree(&map.tree);
    }

    #[test]
    fn test_empty_failures() {
        let mut map: TreapMap<u32, u32> = TreapMap::new();
        assert_eq!(map.min(), Err(Error::EmptyContainer));
        assert_eq!(map.max(), Err(Error::EmptyContainer));
        assert_eq!(map.remove_min(), Err(Error::EmptyContainer));
        assert_eq!(map.remove_max(), Err(Error::EmptyContainer));
        assert_eq!(map.lookup(&1), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_get_mut() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        *map.get_mut(&1).unwrap() = 3;
        map[&1] += 1;
        assert_eq!(map[&1], 4);
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_clear() {
        let mut map = TreapMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.min(), Err(Error::EmptyContainer));
        map.insert(3, 3);
        assert_eq!(map.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&3, &3)]);
    }

    #[test]
    fn test_clone_independent() {
        let mut map = TreapMap::new();
        map.insert(1, String::from("a"));
        map.insert(2, String::from("b"));
        map.insert(3, String::from("c"));

        let mut copy = map.clone();
        assert_eq!(copy.remove(&2), Some((2, String::from("b"))));
        copy.get_mut(&1).unwrap().push('!');
        map.insert(4, String::from("d"));

        assert_eq!(map.len(), 4);
        assert_eq!(map[&1], "a");
        assert_eq!(map[&2], "b");
        assert_eq!(copy.len(), 2);
        assert_eq!(copy[&1], "a!");
        assert!(!copy.contains_key(&4));
        check_tree(&map.tree);
        check_tree(&copy.tree);
    }

    #[test]
    fn test_clone_same_shape() {
        let mut map = TreapMap::with_rng(XorShiftRng::from_seed([3, 1, 4, 1]));
        for key in 0..64 {
            map.insert(key, key);
        }
        let copy = map.clone();
        assert_eq!(copy.tree.root, map.tree.root);
        for key in 0..64 {
            let handle = map.tree.find(&map.comparator, &key).unwrap();
            assert_eq!(copy.tree.nodes[handle].key, key);
            assert_eq!(copy.tree.nodes[handle].priority, map.tree.nodes[handle].priority);
            assert_eq!(copy.tree.nodes[handle].left, map.tree.nodes[handle].left);
            assert_eq!(copy.tree.nodes[handle].right.get(), map.tree.nodes[handle].right.get());
        }
    }

    #[test]
    fn test_iter_restores_links() {
        let mut rng = XorShiftRng::from_seed([1, 1, 1, 1]);
        let mut map = TreapMap::with_rng(XorShiftRng::from_seed([2, 2, 2, 2]));
        let mut expected = Vec::new();
        for _ in 0..500 {
            let key = rng.gen::<u32>() % 1_000;
            map.insert(key, key);
            expected.push(key);
        }
        expected.sort();
        expected.dedup();

        let keys = map.iter().map(|(key, _)| *key).collect::<Vec<u32>>();
        assert_eq!(keys, expected);
        assert!(!has_threads(&map));
        check_tree(&map.tree);
    }

    #[test]
    fn test_iter_dropped_early() {
        let mut map = TreapMap::new();
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            map.insert(*key, ());
        }
        {
            let mut iter = map.iter();
            assert_eq!(iter.next(), Some((&1, &())));
            assert_eq!(iter.next(), Some((&2, &())));
        }
        assert!(!has_threads(&map));
        check_tree(&map.tree);
        assert_eq!(
            map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(),
            vec![1, 2, 3, 4, 5, 6, 7],
        );
    }

    #[test]
    fn test_leaked_iter_then_iter() {
        for consumed in 0..8 {
            let mut map = half_iterated(consumed);
            assert_eq!(keys(&mut map), vec![1, 2, 3, 4, 5, 6, 7]);
            assert!(!has_threads(&map));
            check_tree(&map.tree);
        }
    }

    #[test]
    fn test_leaked_iter_then_lookup() {
        let map = half_iterated(2);
        for key in 1..8 {
            assert_eq!(map.get(&key), Some(&(key * 10)));
        }
        assert_eq!(map.min(), Ok((&1, &10)));
        assert_eq!(map.max(), Ok((&7, &70)));
        assert!(!has_threads(&map));
        check_tree(&map.tree);
    }

    #[test]
    fn test_leaked_iter_then_mutate() {
        let mut map = half_iterated(3);
        assert_eq!(map.remove(&4), Some((4, 40)));
        assert_eq!(map.insert(8, 80), None);
        assert_eq!(map.remove_max(), Ok((8, 80)));
        assert_eq!(map.remove_min(), Ok((1, 10)));
        check_tree(&map.tree);
        assert_eq!(keys(&mut map), vec![2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_leaked_iter_then_clone() {
        let map = half_iterated(5);
        let mut copy = map.clone();
        assert!(!has_threads(&map));
        check_tree(&copy.tree);
        assert_eq!(keys(&mut copy), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            map.into_iter().map(|(key, _)| key).collect::<Vec<u32>>(),
            vec![1, 2, 3, 4, 5, 6, 7],
        );
    }

    #[test]
    fn test_leaked_iter_then_debug() {
        let map = half_iterated(1);
        assert_eq!(
            format!("{:?}", map),
            "{1: 10, 2: 20, 3: 30, 4: 40, 5: 50, 6: 60, 7: 70}",
        );
    }

    #[test]
    fn test_into_iter() {
        let mut map = TreapMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        let iter = map.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<(u32, u32)>>(), vec![(1, 2), (3, 4), (5, 6)]);
    }

    #[test]
    fn test_heap_property_after_mixed_operations() {
        let mut rng = XorShiftRng::from_seed([5, 6, 7, 8]);
        let mut map = TreapMap::with_rng(XorShiftRng::from_seed([8, 7, 6, 5]));
        for _ in 0..2_000 {
            let key = rng.gen_range(0, 200);
            match rng.gen_range(0, 4) {
                0 => {
                    map.remove(&key);
                },
                1 => {
                    let _ = map.remove_min();
                },
                _ => {
                    map.insert(key, key);
                },
            }
        }
        check_tree(&map.tree);
    }

    #[test]
    fn test_custom_comparator() {
        let mut map = TreapMap::with_comparator(|a: &u32, b: &u32| b.cmp(a));
        for key in &[1, 3, 2] {
            map.insert(*key, ());
        }
        assert_eq!(map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![3, 2, 1]);
        assert_eq!(map.remove_min(), Ok((3, ())));
        assert_eq!(map.max(), Ok((&1, &())));
    }

    #[test]
    fn test_debug() {
        let mut map = TreapMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);
        assert!(!has_threads(&map));
    }

    struct HasSuccessor {
        map: Rc<RefCell<TreapMap<u32, HasSuccessor>>>,
        key: u32,
    }

    impl fmt::Debug for HasSuccessor {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", self.map.borrow().contains_key(&(self.key + 1)))
        }
    }

    #[test]
    fn test_debug_values_can_read_map() {
        let map = Rc::new(RefCell::new(TreapMap::new()));
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            let value = HasSuccessor {
                map: Rc::clone(&map),
                key: *key,
            };
            map.borrow_mut().insert(*key, value);
        }
        assert_eq!(
            format!("{:?}", map.borrow()),
            "{1: true, 2: true, 3: true, 4: true, 5: true, 6: true, 7: false}",
        );
        map.borrow_mut().clear();
    }
}

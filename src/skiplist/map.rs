use crate::arena::{Handle, TypedArena};
use crate::comparator::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::skiplist::{Node, MAX_LEVEL};
use log::trace;
use rand::Rng;
use rand::XorShiftRng;
use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

const ARENA_CHUNK_SIZE: usize = 256;

/// An ordered map implemented by a skiplist.
///
/// A skiplist is a probabilistic data structure that allows for binary search tree operations by
/// maintaining a linked hierarchy of subsequences. The first subsequence is essentially a sorted
/// linked list of all the elements that it contains. Each successive subsequence contains
/// approximately half the elements of the previous subsequence. Using the sparser subsequences,
/// elements can be skipped and searching, insertion, and deletion of entries can be done in
/// approximately logarithm time.
///
/// Keys are ordered by a `Comparator`, which defaults to the key type's `Ord` implementation.
/// The height of each node is drawn from the map's own random number generator, which can be
/// injected with `with_rng` for reproducible layouts.
///
/// # Examples
///
/// ```
/// use randomized_collections::skiplist::SkipMap;
///
/// let mut map = SkipMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct SkipMap<K, V, C = Natural> {
    head: Vec<Option<Handle>>,
    nodes: TypedArena<Node<K, V>>,
    comparator: C,
    rng: XorShiftRng,
    len: usize,
}

impl<K, V> SkipMap<K, V>
where K: Ord
{
    /// Constructs a new, empty `SkipMap<K, V>` ordered by `K`'s `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let map: SkipMap<u32, u32> = SkipMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Constructs a new, empty `SkipMap<K, V>` that draws node heights from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    /// use rand::{SeedableRng, XorShiftRng};
    ///
    /// let rng = XorShiftRng::from_seed([1, 2, 3, 4]);
    /// let map: SkipMap<u32, u32> = SkipMap::with_rng(rng);
    /// ```
    pub fn with_rng(rng: XorShiftRng) -> Self {
        Self::with_comparator_and_rng(Natural, rng)
    }
}

impl<K, V, C> SkipMap<K, V, C>
where C: Comparator<K>
{
    /// Constructs a new, empty `SkipMap<K, V, C>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::with_comparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
    /// map.insert(-2, 0);
    /// map.insert(1, 0);
    /// assert!(map.contains_key(&2));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_rng(comparator, XorShiftRng::new_unseeded())
    }

    /// Constructs a new, empty `SkipMap<K, V, C>` ordered by `comparator` that draws node heights
    /// from `rng`.
    pub fn with_comparator_and_rng(comparator: C, rng: XorShiftRng) -> Self {
        SkipMap {
            head: Vec::new(),
            nodes: TypedArena::new(ARENA_CHUNK_SIZE),
            comparator,
            rng,
            len: 0,
        }
    }

    // Geometric distribution with p = 0.5, capped at MAX_LEVEL.
    fn gen_random_height(&mut self) -> usize {
        cmp::min(self.rng.next_u32().leading_zeros() as usize + 1, MAX_LEVEL)
    }

    // `None` refers to the head.
    fn link(&self, curr: Option<Handle>, level: usize) -> Option<Handle> {
        match curr {
            None => self.head.get(level).and_then(|link| *link),
            Some(handle) => self.nodes[handle].links[level],
        }
    }

    fn link_mut(&mut self, curr: Option<Handle>, level: usize) -> &mut Option<Handle> {
        match curr {
            None => &mut self.head[level],
            Some(handle) => &mut self.nodes[handle].links[level],
        }
    }

    // Returns, for every active level, the last node whose key is less than `key`.
    fn find_updates(&self, key: &K) -> [Option<Handle>; MAX_LEVEL] {
        let mut updates = [None; MAX_LEVEL];
        let mut curr = None;
        for level in (0..self.head.len()).rev() {
            while let Some(next) = self.link(curr, level) {
                if self.comparator.compare(&self.nodes[next].key, key) != Ordering::Less {
                    break;
                }
                curr = Some(next);
            }
            updates[level] = curr;
        }
        updates
    }

    fn find(&self, key: &K) -> Option<Handle> {
        let mut curr = None;
        for level in (0..self.head.len()).rev() {
            while let Some(next) = self.link(curr, level) {
                match self.comparator.compare(&self.nodes[next].key, key) {
                    Ordering::Less => curr = Some(next),
                    Ordering::Equal => return Some(next),
                    Ordering::Greater => break,
                }
            }
        }
        None
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, its value is
    /// replaced in place and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let updates = self.find_updates(&key);

        if let Some(next) = self.link(updates[0], 0) {
            if self.comparator.compare(&self.nodes[next].key, &key) == Ordering::Equal {
                return Some(mem::replace(&mut self.nodes[next].value, value));
            }
        }

        let height = self.gen_random_height();
        let level_count = self.head.len();
        let threaded = cmp::min(height, level_count);

        let mut links = vec![None; height];
        for level in 0..threaded {
            links[level] = self.link(updates[level], level);
        }
        let new_node = self.nodes.allocate(Node { key, value, links });
        for level in 0..threaded {
            *self.link_mut(updates[level], level) = Some(new_node);
        }

        if height > level_count {
            trace!("skiplist grew from {} to {} levels", level_count, height);
            self.head.resize(height, Some(new_node));
        }

        self.len += 1;
        None
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None` and leave the map unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let updates = self.find_updates(key);

        let target = match self.link(updates[0], 0) {
            Some(next) if self.comparator.compare(&self.nodes[next].key, key) == Ordering::Equal => next,
            _ => return None,
        };

        for level in 0..self.nodes[target].links.len() {
            let next = self.nodes[target].links[level];
            *self.link_mut(updates[level], level) = next;
        }

        let level_count = self.head.len();
        while let Some(None) = self.head.last() {
            self.head.pop();
        }
        if self.head.len() < level_count {
            trace!("skiplist shrank from {} to {} levels", level_count, self.head.len());
        }

        self.len -= 1;
        let Node { key, value, .. } = self.nodes.free(target);
        Some((key, value))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|handle| &self.nodes[handle].value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Some(handle) => Some(&mut self.nodes[handle].value),
            None => None,
        }
    }

    /// Returns the value associated with a particular key, or `Error::KeyNotFound` if the key
    /// does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    /// use randomized_collections::Error;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.lookup(&1), Ok(&"a"));
    /// assert_eq!(map.lookup(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let map: SkipMap<u32, u32> = SkipMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.head.clear();
        self.nodes.clear();
        self.len = 0;
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use randomized_collections::skiplist::SkipMap;
    ///
    /// let mut map = SkipMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SkipMapIter<K, V> {
        SkipMapIter {
            nodes: &self.nodes,
            current: self.link(None, 0),
            remaining: self.len,
        }
    }
}

impl<K, V, C> IntoIterator for SkipMap<K, V, C>
where C: Comparator<K>
{
    type Item = (K, V);
    type IntoIter = SkipMapIntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let current = self.link(None, 0);
        SkipMapIntoIter {
            nodes: self.nodes,
            current,
            remaining: self.len,
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a SkipMap<K, V, C>
where C: Comparator<K>
{
    type Item = (&'a K, &'a V);
    type IntoIter = SkipMapIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SkipMap<K, V, C>`.
///
/// This iterator traverses the elements of a map in ascending order and yields owned entries.
pub struct SkipMapIntoIter<K, V> {
    nodes: TypedArena<Node<K, V>>,
    current: Option<Handle>,
    remaining: usize,
}

impl<K, V> Iterator for SkipMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.current?;
        let Node { key, value, links } = self.nodes.free(handle);
        self.current = links[0];
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for SkipMapIntoIter<K, V> {}

/// An iterator for `SkipMap<K, V, C>`.
///
/// This iterator follows the bottom level of the map, so it yields immutable references to
/// key-value pairs in ascending order.
pub struct SkipMapIter<'a, K, V> {
    nodes: &'a TypedArena<Node<K, V>>,
    current: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iterator for SkipMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let handle = self.current?;
        let Node { ref key, ref value, ref links } = nodes[handle];
        self.current = links[0];
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for SkipMapIter<'a, K, V> {}

impl<K, V> Default for SkipMap<K, V>
where K: Ord
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> fmt::Debug for SkipMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Comparator<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> Index<&'a K> for SkipMap<K, V, C>
where C: Comparator<K>
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        self.get(key).expect("Key does not exist.")
    }
}

impl<'a, K, V, C> IndexMut<&'a K> for SkipMap<K, V, C>
where C: Comparator<K>
{
    fn index_mut(&mut self, key: &K) -> &mut Self::Output {
        self.get_mut(key).expect("Key does not exist.")
    }
}

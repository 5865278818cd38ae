//! Probabilistic linked hierarchy of subsequences.

mod map;

pub use self::map::{SkipMap, SkipMapIntoIter, SkipMapIter};
use crate::arena::Handle;

/// The maximum number of levels a node, and therefore the map, can have.
pub const MAX_LEVEL: usize = 32;

/// A struct representing an internal node of a skiplist.
///
/// `links[i]` is the next node at level `i`. The number of links is fixed when the node is
/// created.
struct Node<K, V> {
    key: K,
    value: V,
    links: Vec<Option<Handle>>,
}

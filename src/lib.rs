//! Ordered maps balanced by randomization instead of deterministic rotation rules.
//!
//! Two independent engines are provided:
//!
//! - `skiplist::SkipMap`, a tower of sorted linked lists where every level skips roughly half of
//!   the level below it.
//! - `treap::TreapMap`, a binary search tree that is also a min-heap on random node priorities.
//!
//! Both give expected logarithmic lookup, insertion, and removal, and both enumerate entries in
//! ascending key order. Neither is thread safe.
//!
//! # Examples
//!
//! ```
//! use randomized_collections::skiplist::SkipMap;
//! use randomized_collections::treap::TreapMap;
//! use randomized_collections::Error;
//!
//! let mut skipmap = SkipMap::new();
//! let mut treap = TreapMap::new();
//! for key in &[5, 3, 8, 1] {
//!     skipmap.insert(*key, ());
//!     treap.insert(*key, ());
//! }
//!
//! assert_eq!(skipmap.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![1, 3, 5, 8]);
//! assert_eq!(treap.remove_min(), Ok((1, ())));
//! assert_eq!(skipmap.lookup(&2), Err(Error::KeyNotFound));
//! ```

pub mod arena;
pub mod comparator;
mod error;
pub mod skiplist;
pub mod treap;

pub use crate::comparator::{Comparator, Natural};
pub use crate::error::{Error, Result};

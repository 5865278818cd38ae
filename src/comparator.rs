//! Total orders over keys.

use std::cmp::Ordering;

/// A total order over keys of type `K`.
///
/// Every closure or function of type `Fn(&K, &K) -> Ordering` is a comparator, so a custom order
/// can be supplied inline.
///
/// # Examples
///
/// ```
/// use randomized_collections::skiplist::SkipMap;
///
/// let mut map = SkipMap::with_comparator(|a: &u32, b: &u32| b.cmp(a));
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![2, 1]);
/// ```
pub trait Comparator<K> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The comparator used by default: the key type's own `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<K> Comparator<K> for Natural
where K: Ord
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Comparator<K> for F
where F: Fn(&K, &K) -> Ordering
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparator, Natural};
    use std::cmp::Ordering;

    #[test]
    fn test_natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare(&"b", &"a"), Ordering::Greater);
        assert_eq!(Natural.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn test_closure() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(by_len.compare(&"aaa", &"b"), Ordering::Greater);
        assert_eq!(by_len.compare(&"a", &"b"), Ordering::Equal);
    }
}

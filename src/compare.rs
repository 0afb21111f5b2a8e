//! Key ordering for the trees in this crate.
//!
//! A tree never inspects its keys directly.  Every comparison goes through a
//! [`Compare`] value that the tree owns from construction onward.  Keys with an
//! intrinsic total order use [`Natural`]; anything else supplies a closure or a
//! type of its own.

use std::cmp::Ordering;

/// A total order over values of type `K`.
///
/// Implementations must be consistent: `compare(a, b)` is the reverse of
/// `compare(b, a)`, and the relation is transitive.  A tree built with an
/// inconsistent comparator keeps its shape invariants but may lose track of
/// keys.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator:
/// ```
/// use ordered_balanced_tree::{Compare, OrderedBalancedTree};
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert!(by_len.compare(&"ab", &"abc").is_lt());
///
/// let mut t = OrderedBalancedTree::with_comparator(by_len);
/// t.insert("ccc", 3).insert("a", 1).insert("bb", 2);
/// assert_eq!(t.to_string(), "1 | 2 | 3");
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares `lhs` to `rhs`.
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// The comparator for keys with an intrinsic total order ([`Ord`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}

use super::{Iter, OrderedBalancedTree};
use crate::compare::{Compare, Natural};
use crate::error::InvariantViolation;
use std::fmt::{Debug, Display, Formatter};
use std::iter::FusedIterator;

/// A sorted set of values.
///
/// The implementation is a thin wrapper around [`OrderedBalancedTree`] with
/// unit values.  Formatting the set with [`Display`] lists its elements in
/// order, separated by `" | "`.
///
/// # Examples
/// ```
/// use ordered_balanced_tree::OrderedBalancedSet;
///
/// let mut s = OrderedBalancedSet::new();
/// s.insert("pear").insert("apple").insert("fig").remove(&"pear");
/// assert_eq!(s.to_string(), "apple | fig");
/// ```
#[derive(Clone)]
pub struct OrderedBalancedSet<T, C = Natural> {
    tree: OrderedBalancedTree<T, (), C>,
}

impl<T: Ord> OrderedBalancedSet<T> {
    /// Creates a new, empty set ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C: Compare<T>> OrderedBalancedSet<T, C> {
    /// Creates a new, empty set ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        OrderedBalancedSet {
            tree: OrderedBalancedTree::with_comparator(cmp),
        }
    }

    /// Adds a value to the set.  A value equal to one already present is
    /// dropped, leaving the stored element in place.
    pub fn insert(&mut self, value: T) -> &mut Self {
        if !self.tree.contains(&value) {
            self.tree.insert(value, ());
        }
        self
    }

    /// Tests if self contains the given value.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Removes a value from the set, if present.
    pub fn remove(&mut self, value: &T) -> &mut Self {
        self.tree.remove(value);
        self
    }

    /// Removes and returns the element equal to `value`, if any.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedSet;
    ///
    /// let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
    /// let mut s = OrderedBalancedSet::with_comparator(by_abs);
    /// s.insert(-3).insert(2);
    /// assert_eq!(s.take(&3), Some(-3));
    /// assert_eq!(s.take(&3), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.tree.take_entry(value).map(|(k, _)| k)
    }

    /// Returns the number of elements that compare less than `value`.
    pub fn rank(&self, value: &T) -> usize {
        self.tree.rank(value)
    }

    /// Verifies the structural invariants of the underlying tree.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        self.tree.check()
    }
}

impl<T, C> OrderedBalancedSet<T, C> {
    /// Removes all the elements from self.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the number of elements in self.
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if self is the empty set, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the least value in the set.
    pub fn first(&self) -> Option<&T> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    /// Returns the greatest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    /// Returns the element at 0-based position `index` in sorted order.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.tree.get_index(index).map(|(k, _)| k)
    }

    /// Returns an iterator over self's values in sorted order.
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            iter: self.tree.iter(),
        }
    }
}

impl<T: Ord> Default for OrderedBalancedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, C> PartialEq for OrderedBalancedSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for OrderedBalancedSet<T, C> {}

impl<T: Debug, C> Debug for OrderedBalancedSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Display, C> Display for OrderedBalancedSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", x)?;
        }

        Ok(())
    }
}

impl<T, C: Compare<T>> Extend<T> for OrderedBalancedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedBalancedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut s = Self::new();
        s.extend(iter);
        s
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedBalancedSet<T, C> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of an [`OrderedBalancedSet`], in order.
pub struct SetIter<'a, T> {
    iter: Iter<'a, T, ()>,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for SetIter<'_, T> {}

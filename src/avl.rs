#![warn(missing_docs)]
use crate::compare::{Compare, Natural};
use crate::error::InvariantViolation;
use log::{debug, trace};
use std::cmp::Ordering::*;
use std::fmt::{Debug, Display, Formatter};
use std::iter::FusedIterator;
use std::mem::replace;

mod avl_set;
pub use avl_set::{OrderedBalancedSet, SetIter};

type Link<K, V> = Option<Box<Node<K, V>>>;

// verifies a tree after each update, but only in our own unit tests
#[cfg(test)]
macro_rules! chk_tree {
    ( $t:expr ) => {
        if let Err(e) = $t.check() {
            panic!("{}", e);
        }
    };
}

#[cfg(not(test))]
macro_rules! chk_tree {
    ( $t:expr ) => {};
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    val: V,
    height: i8,
    size: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, val: V) -> Box<Self> {
        Box::new(Node {
            key,
            val,
            height: 1,
            size: 1,
            left: None,
            right: None,
        })
    }

    // Returns the "balance factor" of the node: positive when left-heavy
    fn bal(&self) -> i8 {
        height(&self.left) - height(&self.right)
    }

    // Recomputes height and size from the children, which must be current.
    fn update(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
        self.size = len(&self.left) + 1 + len(&self.right);
    }

    fn for_each<F: FnMut((&K, &V))>(&self, g: &mut F) {
        if let Some(lf) = self.left.as_ref() {
            lf.for_each(g);
        }

        g((&self.key, &self.val));

        if let Some(rt) = self.right.as_ref() {
            rt.for_each(g);
        }
    }
}

impl<K: Debug, V: Debug> Debug for Node<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "(ht: {} {{{:?}: {:?}}} ",
            self.height, self.key, self.val
        ))?;

        match &self.left {
            None => f.write_str(".")?,
            Some(lf) => Debug::fmt(lf, f)?,
        }

        f.write_str(" ")?;

        match &self.right {
            None => f.write_str(".")?,
            Some(rt) => Debug::fmt(rt, f)?,
        }

        f.write_str(")")
    }
}

fn height<K, V>(link: &Link<K, V>) -> i8 {
    link.as_ref().map_or(0, |n| n.height)
}

fn len<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

fn rot_rt<K, V>(mut a: Box<Node<K, V>>) -> Box<Node<K, V>> {
    // We want the following transformation:
    //    a(b(x, y), z)   =>   b(x, a(y, z))
    // x and z retain the same parents.
    let Some(mut b) = a.left.take() else {
        return a;
    };

    a.left = b.right.take();
    a.update();

    b.right = Some(a);
    b.update();
    b
}

fn rot_lf<K, V>(mut a: Box<Node<K, V>>) -> Box<Node<K, V>> {
    // We want the following transformation:
    //    a(x, b(y, z))   =>   b(a(x, y), z)
    // x and z retain the same parents.
    let Some(mut b) = a.right.take() else {
        return a;
    };

    a.right = b.left.take();
    a.update();

    b.left = Some(a);
    b.update();
    b
}

// Refreshes n's bookkeeping and, if n is out of balance by two, rotates it
// back into balance.  Returns the root of the rebalanced subtree.
fn rebal<K, V>(mut n: Box<Node<K, V>>) -> Box<Node<K, V>> {
    n.update();

    match n.bal() {
        2 => {
            if n.left.as_ref().map_or(0, |lf| lf.bal()) < 0 {
                trace!("rebalance: left-right rotation (subtree height {})", n.height);
                n.left = n.left.take().map(rot_lf);
            } else {
                trace!("rebalance: right rotation (subtree height {})", n.height);
            }
            rot_rt(n)
        }

        -2 => {
            if n.right.as_ref().map_or(0, |rt| rt.bal()) > 0 {
                trace!("rebalance: right-left rotation (subtree height {})", n.height);
                n.right = n.right.take().map(rot_rt);
            } else {
                trace!("rebalance: left rotation (subtree height {})", n.height);
            }
            rot_lf(n)
        }

        _ => n,
    }
}

fn rebal_link<K, V>(link: &mut Link<K, V>) {
    if let Some(n) = link.take() {
        *link = Some(rebal(n));
    }
}

// Inserts (k,v) into the tree rooted at link and returns the replaced value.
// Ancestors are only revisited when a new node was created.
fn ins<K, V, C>(link: &mut Link<K, V>, k: K, v: V, cmp: &C) -> Option<V>
where
    C: Compare<K>,
{
    let n = match link.as_mut() {
        None => {
            *link = Some(Node::leaf(k, v));
            return None; // *** EARLY RETURN ***
        }

        Some(n) => n,
    };

    let old_v = match cmp.compare(&k, &n.key) {
        Equal => return Some(replace(&mut n.val, v)),
        Less => ins(&mut n.left, k, v, cmp),
        Greater => ins(&mut n.right, k, v, cmp),
    };

    if old_v.is_none() {
        rebal_link(link);
    }

    old_v
}

// helper function for rm that unlinks the leftmost node of the tree and
// returns its key and value.
fn rm_leftmost<K, V>(link: &mut Link<K, V>) -> Option<(K, V)> {
    let n = link.as_mut()?;

    if n.left.is_some() {
        let kv = rm_leftmost(&mut n.left);
        rebal_link(link);
        kv
    } else {
        let old_n = *link.take()?;
        *link = old_n.right;
        Some((old_n.key, old_n.val))
    }
}

// Removes k from the tree rooted at link and returns the removed entry.
fn rm<K, V, C>(link: &mut Link<K, V>, k: &K, cmp: &C) -> Option<(K, V)>
where
    C: Compare<K>,
{
    let n = link.as_mut()?;

    let removed = match cmp.compare(k, &n.key) {
        Less => rm(&mut n.left, k, cmp),
        Greater => rm(&mut n.right, k, cmp),

        Equal if n.left.is_some() && n.right.is_some() => {
            // Both children are populated: adopt the in-order successor's
            // entry and unlink the successor, which has no left child.
            let (succ_key, succ_val) = rm_leftmost(&mut n.right)?;
            let old_key = replace(&mut n.key, succ_key);
            let old_val = replace(&mut n.val, succ_val);
            Some((old_key, old_val))
        }

        Equal => {
            let old_n = *link.take()?;
            *link = old_n.left.or(old_n.right);
            return Some((old_n.key, old_n.val)); // *** EARLY RETURN ***
        }
    };

    if removed.is_some() {
        rebal_link(link);
    }

    removed
}

// Verifies the subtree at link.  `greatest` is the greatest key visited so far
// by the in-order walk and `pos` the number of keys visited so far.  Returns
// the greatest key of the subtree (or the incoming one, if it is empty).
fn chk<'a, K, V, C: Compare<K>>(
    link: &'a Link<K, V>,
    greatest: Option<&'a K>,
    pos: &mut usize,
    cmp: &C,
) -> Result<Option<&'a K>, InvariantViolation> {
    let n = match link.as_ref() {
        None => return Ok(greatest),
        Some(n) => n,
    };

    // are our left descendents okay, and all less than us?
    let greatest = chk(&n.left, greatest, pos, cmp)?;
    if greatest.is_some_and(|g| cmp.compare(g, &n.key) != Less) {
        return Err(InvariantViolation::OutOfOrder { position: *pos });
    }

    let position = *pos;
    *pos += 1;

    // are our right descendents okay? (they must exceed our key)
    let greatest = chk(&n.right, Some(&n.key), pos, cmp)?;

    // do we know our height and size?
    let actual = height(&n.left).max(height(&n.right)) + 1;
    if n.height != actual {
        return Err(InvariantViolation::StaleHeight {
            position,
            recorded: n.height,
            actual,
        });
    }

    let actual = len(&n.left) + 1 + len(&n.right);
    if n.size != actual {
        return Err(InvariantViolation::StaleSize {
            position,
            recorded: n.size,
            actual,
        });
    }

    // are we balanced?
    if !(-1..=1).contains(&n.bal()) {
        return Err(InvariantViolation::Unbalanced {
            position,
            balance: n.bal(),
        });
    }

    Ok(greatest)
}

/// An ordered map built on a self-balancing binary search tree.
///
/// The tree is an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree): every
/// node's subtrees differ in height by at most one, so lookups, insertions,
/// and removals all take O(log n) comparisons.  Each node owns its children
/// outright; mutations restructure the path from the root to the affected
/// node and leave the rest of the tree untouched.
///
/// Keys are ordered by a comparator of type `C` chosen at construction.  The
/// default, [`Natural`], uses the key's [`Ord`] implementation; any
/// `Fn(&K, &K) -> Ordering` works as well.
///
/// The mutators [`insert`](#method.insert) and [`remove`](#method.remove)
/// return the tree itself so calls can be chained.  Formatting the tree with
/// [`Display`] lists its values in key order, separated by `" | "`.
///
/// # Examples
/// ```
/// use ordered_balanced_tree::OrderedBalancedTree;
///
/// let mut t = OrderedBalancedTree::new();
/// t.insert(2, "two").insert(1, "one").insert(3, "three").remove(&2);
/// assert_eq!(t.to_string(), "one | three");
/// assert_eq!(t.find(&1), Some(&"one"));
/// assert_eq!(t.find(&2), None);
/// ```
#[derive(Clone)]
pub struct OrderedBalancedTree<K, V, C = Natural> {
    len: usize,
    root: Link<K, V>,
    cmp: C,
}

impl<K: Ord, V> OrderedBalancedTree<K, V> {
    /// Creates a new, empty tree ordered by `K`'s [`Ord`] implementation.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    /// let t: OrderedBalancedTree<usize, usize> = OrderedBalancedTree::new();
    /// assert!(t.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C: Compare<K>> OrderedBalancedTree<K, V, C> {
    /// Creates a new, empty tree ordered by `cmp`.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// t.insert(1, 'a').insert(3, 'c').insert(2, 'b');
    /// assert_eq!(t.to_string(), "c | b | a");
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        OrderedBalancedTree {
            len: 0,
            root: None,
            cmp,
        }
    }

    /// Returns the comparator that orders the tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Inserts a key-value pair and returns the tree for further chaining.
    ///
    /// If the tree already holds a key that compares equal to `key`, only its
    /// value is replaced; the stored key and the shape of the tree are left
    /// as they were.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert(0, "a").insert(0, "b");
    /// assert_eq!(t.size(), 1);
    /// assert_eq!(t.find(&0), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> &mut Self {
        self.put(key, val);
        self
    }

    /// Inserts a key-value pair and returns the value it replaced, if any.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// assert_eq!(t.put(7, 'x'), None);
    /// assert_eq!(t.put(7, 'y'), Some('x'));
    /// ```
    pub fn put(&mut self, key: K, val: V) -> Option<V> {
        let ret = ins(&mut self.root, key, val, &self.cmp);
        self.len += ret.is_none() as usize;
        chk_tree!(self);
        ret
    }

    /// Returns a reference to the value associated with `key`, or `None` if
    /// the tree holds no such key.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert(1, 0);
    /// assert_eq!(t.find(&1), Some(&0));
    /// assert_eq!(t.find(&2), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&V> {
        let mut curr = &self.root;
        while let Some(n) = curr {
            match self.cmp.compare(key, &n.key) {
                Less => curr = &n.left,
                Equal => return Some(&n.val),
                Greater => curr = &n.right,
            }
        }

        None
    }

    /// Returns a mutable reference to the value associated with `key`.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert(1, 7);
    ///
    /// if let Some(v) = t.find_mut(&1) {
    ///     *v = 2;
    /// }
    /// assert_eq!(t.find(&1), Some(&2));
    /// ```
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut curr = &mut self.root;
        while let Some(n) = curr {
            match self.cmp.compare(key, &n.key) {
                Less => curr = &mut n.left,
                Equal => return Some(&mut n.val),
                Greater => curr = &mut n.right,
            }
        }

        None
    }

    /// Tests if the tree holds an entry for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry for `key`, if there is one, and returns the tree for
    /// further chaining.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert(1, 2).insert(2, 3);
    /// t.remove(&2).remove(&5);
    /// assert_eq!(t.size(), 1);
    /// ```
    pub fn remove(&mut self, key: &K) -> &mut Self {
        self.take(key);
        self
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert(1, 2).insert(2, 3);
    /// assert_eq!(t.take(&2), Some(3));
    /// assert_eq!(t.take(&2), None);
    /// ```
    pub fn take(&mut self, key: &K) -> Option<V> {
        self.take_entry(key).map(|(_, v)| v)
    }

    pub(crate) fn take_entry(&mut self, key: &K) -> Option<(K, V)> {
        let kv = rm(&mut self.root, key, &self.cmp)?;
        self.len -= 1;
        chk_tree!(self);
        Some(kv)
    }

    /// Returns the number of keys that compare less than `key`.
    ///
    /// When `key` is present, this is its 0-based position in key order.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let t: OrderedBalancedTree<_, _> = [(10, ()), (20, ()), (30, ())].into_iter().collect();
    /// assert_eq!(t.rank(&20), 1);
    /// assert_eq!(t.rank(&25), 2);
    /// assert_eq!(t.rank(&5), 0);
    /// ```
    pub fn rank(&self, key: &K) -> usize {
        let mut rank = 0;
        let mut curr = &self.root;
        while let Some(n) = curr {
            match self.cmp.compare(key, &n.key) {
                Less => curr = &n.left,
                Equal => return rank + len(&n.left),
                Greater => {
                    rank += len(&n.left) + 1;
                    curr = &n.right;
                }
            }
        }

        rank
    }

    /// Verifies the tree's structural invariants: keys strictly increase in
    /// order, every node records its true height and subtree size, sibling
    /// subtrees differ in height by at most one, and the entry count matches
    /// the number of nodes.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        let mut actual = 0;
        chk(&self.root, None, &mut actual, &self.cmp)?;
        if actual != self.len {
            return Err(InvariantViolation::LenMismatch {
                recorded: self.len,
                actual,
            });
        }

        Ok(())
    }
}

impl<K: Clone, C: Compare<K>> OrderedBalancedTree<K, K, C> {
    /// Inserts `key` as its own value.  This is the set-like form of
    /// [`insert`](#method.insert) for trees whose keys and values coincide.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let mut t = OrderedBalancedTree::new();
    /// t.insert_key(3).insert_key(1).insert_key(2);
    /// assert_eq!(t.to_string(), "1 | 2 | 3");
    /// ```
    pub fn insert_key(&mut self, key: K) -> &mut Self {
        let val = key.clone();
        self.insert(key, val)
    }
}

impl<K, V, C> OrderedBalancedTree<K, V, C> {
    /// Drops all entries from the tree.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} entries", self.len);
        self.len = 0;
        self.root = None;
    }

    /// Returns the number of entries in the tree.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Returns the entry with the least key.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let t: OrderedBalancedTree<_, _> = [(2, 0), (1, 0)].into_iter().collect();
    /// assert_eq!(t.first_key_value(), Some((&1, &0)));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut curr = self.root.as_deref()?;
        while let Some(n) = curr.left.as_deref() {
            curr = n;
        }
        Some((&curr.key, &curr.val))
    }

    /// Returns the entry with the greatest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut curr = self.root.as_deref()?;
        while let Some(n) = curr.right.as_deref() {
            curr = n;
        }
        Some((&curr.key, &curr.val))
    }

    /// Returns the entry at 0-based position `index` in key order.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let t: OrderedBalancedTree<_, _> = (0..10).map(|i| (i * 2, i)).collect();
    /// assert_eq!(t.get_index(3), Some((&6, &3)));
    /// assert_eq!(t.get_index(10), None);
    /// ```
    pub fn get_index(&self, mut index: usize) -> Option<(&K, &V)> {
        let mut curr = &self.root;
        while let Some(n) = curr {
            let lf_len = len(&n.left);
            match index.cmp(&lf_len) {
                Less => curr = &n.left,
                Equal => return Some((&n.key, &n.val)),
                Greater => {
                    index -= lf_len + 1;
                    curr = &n.right;
                }
            }
        }

        None
    }

    /// Creates an iterator over the entries, sorted by key.
    ///
    /// # Examples
    /// ```
    /// use ordered_balanced_tree::OrderedBalancedTree;
    ///
    /// let t: OrderedBalancedTree<_, _> = [(0, 1), (1, 2), (2, 3)].into_iter().collect();
    /// for (i, (k, v)) in t.iter().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i + 1), v);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut work = Vec::with_capacity(self.height());
        let mut curr = self.root.as_deref();
        while let Some(n) = curr {
            work.push(n);
            curr = n.left.as_deref();
        }

        Iter {
            work,
            len: self.len,
        }
    }

    /// Produces an iterator over the keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|p| p.0)
    }

    /// Produces an iterator over the values, ordered by their keys.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|p| p.1)
    }

    /// Applies f to each entry in key order.
    ///
    /// This avoids the iterator's work stack and is marginally faster than
    /// [`iter`](#method.iter).
    pub fn for_each<F: FnMut((&K, &V))>(&self, mut f: F) {
        if let Some(n) = self.root.as_ref() {
            n.for_each(&mut f);
        }
    }
}

impl<K: Ord, V> Default for OrderedBalancedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug, C> Debug for OrderedBalancedTree<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            None => f.write_str("OrderedBalancedTree(EMPTY)"),
            Some(n) => f.write_fmt(format_args!(
                "OrderedBalancedTree(#{}, {:?})",
                self.len, n
            )),
        }
    }
}

/// Lists the values in key order, separated by `" | "`.  An empty tree
/// formats as the empty string.
impl<K, V: Display, C> Display for OrderedBalancedTree<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.values().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", v)?;
        }

        Ok(())
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrderedBalancedTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for OrderedBalancedTree<K, V, C> {}

impl<K, V, C: Compare<K>> Extend<(K, V)> for OrderedBalancedTree<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedBalancedTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut t = Self::new();
        t.extend(iter);
        t
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedBalancedTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the entries of an [`OrderedBalancedTree`].
pub struct Iter<'a, K, V> {
    // the nodes whose entries and right subtrees are still to be visited
    work: Vec<&'a Node<K, V>>,
    len: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.work.pop().map(|n| {
            self.len -= 1;
            let entry = (&n.key, &n.val);
            let mut curr = n.right.as_deref();
            while let Some(m) = curr {
                self.work.push(m);
                curr = m.left.as_deref();
            }
            entry
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;

    fn bal_test(vs: Vec<(u8, u32)>) {
        let mut t = OrderedBalancedTree::new();
        for &(k, v) in vs.iter() {
            t.insert(k, v);
            t.check().unwrap();
        }
    }

    fn rm_test(vs: Vec<(i8, u32)>) {
        let mut t = OrderedBalancedTree::new();
        let mut btree = std::collections::BTreeMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = k % 32;
                    assert_eq!(t.put(k, v), btree.insert(k, v));
                }

                0 | i8::MIN => (),

                _ => {
                    let k = -k % 32;
                    assert_eq!(t.take(&k), btree.remove(&k));
                }
            }

            assert!(t.iter().eq(btree.iter()));
            assert_eq!(t.size(), btree.len());
            t.check().unwrap();
        }
    }

    // systematically try deleting each element of t
    fn chk_all_removes(t: OrderedBalancedTree<u8, u8>) {
        for (k, v) in t.iter() {
            let mut t2 = t.clone();
            assert_eq!(t2.take(k), Some(*v));
            assert_eq!(t2.size(), t.size() - 1);
            assert!(!t2.contains(k));
            t2.check().unwrap();
        }
    }

    // the height bound for an AVL tree of n nodes is ~1.44 log2(n + 2)
    fn max_avl_height(n: usize) -> usize {
        (1.4405 * ((n + 2) as f64).log2() - 0.3277).floor() as usize
    }

    #[test]
    fn rm_each_test() {
        // build tree in order to encourage skewing
        let t: OrderedBalancedTree<_, _> = (0..32).map(|x| (x, x + 100)).collect();
        chk_all_removes(t);

        // build tree in reverse order to encourage opposite skewing
        let t: OrderedBalancedTree<_, _> =
            (0..32).rev().map(|x| (x, x + 100)).collect();
        chk_all_removes(t);
    }

    #[test]
    fn single_rotations() {
        // ascending inserts need left rotations
        let mut t = OrderedBalancedTree::new();
        t.insert_key(1).insert_key(2).insert_key(3);
        assert_eq!(t.root.as_ref().map(|n| n.key), Some(2));
        assert_eq!(t.height(), 2);

        // descending inserts need right rotations
        let mut t = OrderedBalancedTree::new();
        t.insert_key(3).insert_key(2).insert_key(1);
        assert_eq!(t.root.as_ref().map(|n| n.key), Some(2));
        assert_eq!(t.height(), 2);
    }

    #[test]
    fn double_rotations() {
        // left-right case
        let mut t = OrderedBalancedTree::new();
        t.insert_key(3).insert_key(1).insert_key(2);
        assert_eq!(t.root.as_ref().map(|n| n.key), Some(2));
        assert_eq!(t.to_string(), "1 | 2 | 3");

        // right-left case
        let mut t = OrderedBalancedTree::new();
        t.insert_key(1).insert_key(3).insert_key(2);
        assert_eq!(t.root.as_ref().map(|n| n.key), Some(2));
        assert_eq!(t.to_string(), "1 | 2 | 3");
    }

    #[test]
    fn removal_rebalances_every_ancestor() {
        // A minimal AVL tree of height 5 (Fibonacci shape).  Removing the
        // lone deepest-right leaf forces rotations at more than one level.
        let keys = [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1];
        let mut t = OrderedBalancedTree::new();
        for k in keys {
            t.insert_key(k);
        }
        assert_eq!(t.height(), 5);

        t.remove(&12);
        t.check().unwrap();
        assert_eq!(t.size(), keys.len() - 1);
        assert!(t.height() <= 4);
        assert_eq!(t.to_string(), "1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11");
    }

    #[test]
    fn two_child_removal_uses_successor() {
        let mut t = OrderedBalancedTree::new();
        t.insert_key(2).insert_key(1).insert_key(3);
        t.remove(&2);
        assert_eq!(t.root.as_ref().map(|n| n.key), Some(3));
        assert_eq!(t.to_string(), "1 | 3");
    }

    #[test]
    fn duplicate_insert_keeps_shape() {
        let mut t: OrderedBalancedTree<_, _> = (0..20).map(|x| (x, 0)).collect();
        let before = format!("{:?}", t);
        t.insert(7, 0);
        assert_eq!(format!("{:?}", t), before);

        t.insert(7, 1);
        assert_eq!(t.size(), 20);
        assert_eq!(t.find(&7), Some(&1));
    }

    #[test]
    fn height_stays_logarithmic() {
        let mut t = OrderedBalancedTree::new();
        for k in 0..4096u32 {
            t.insert_key(k);
        }
        assert!(t.height() <= max_avl_height(t.size()));

        for k in (0..4096u32).step_by(3) {
            t.remove(&k);
        }
        t.check().unwrap();
        assert!(t.height() <= max_avl_height(t.size()));
    }

    #[test]
    fn order_statistics() {
        let t: OrderedBalancedTree<_, _> =
            (0..100u32).rev().map(|x| (x * 3, x)).collect();
        for i in 0..100u32 {
            assert_eq!(t.get_index(i as usize), Some((&(i * 3), &i)));
            assert_eq!(t.rank(&(i * 3)), i as usize);
            assert_eq!(t.rank(&(i * 3 + 1)), i as usize + 1);
        }
        assert_eq!(t.get_index(100), None);
    }

    #[test]
    fn iter_len_test() {
        let t: OrderedBalancedTree<_, _> = (0..10).map(|x| (x, ())).collect();

        let mut iter = t.iter();
        let mut cnt = 10;
        while iter.next().is_some() {
            assert_eq!(iter.len(), cnt - 1);
            cnt -= 1;
        }
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn check_reports_corruption() {
        let mut t: OrderedBalancedTree<_, _> = (0..8).map(|x| (x, x)).collect();
        t.check().unwrap();

        t.len += 1;
        assert_eq!(
            t.check(),
            Err(InvariantViolation::LenMismatch {
                recorded: 9,
                actual: 8
            })
        );
        t.len -= 1;

        if let Some(n) = t.root.as_mut() {
            n.height += 1;
        }
        assert!(matches!(
            t.check(),
            Err(InvariantViolation::StaleHeight { .. })
        ));
        if let Some(n) = t.root.as_mut() {
            n.height -= 1;
            n.key = 100;
        }
        assert!(matches!(
            t.check(),
            Err(InvariantViolation::OutOfOrder { .. })
        ));
    }

    #[test]
    fn bal_test_regr1() {
        bal_test(vec![(4, 0), (0, 0), (5, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn bal_test_regr2() {
        bal_test(vec![(3, 0), (0, 0), (1, 0), (2, 0), (4, 0)]);
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![(101, 0), (100, 0), (1, 0), (-100, 0)]);
    }

    #[test]
    fn rm_test_regr2() {
        rm_test(vec![
            (99, 0),
            (1, 0),
            (103, 0),
            (3, 0),
            (98, 0),
            (2, 0),
            (8, 0),
            (4, 0),
            (5, 0),
            (6, 0),
            (7, 0),
            (102, 0),
            (9, 0),
            (97, 0),
            (-102, 0),
            (10, 0),
            (-97, 0),
        ]);
    }

    quickcheck! {
        fn qc_bal_test(vs: Vec<(u8, u32)>) -> () {
            bal_test(vs);
        }

        fn qc_rm_test(vs: Vec<(i8, u32)>) -> () {
            rm_test(vs);
        }

        fn qc_rank_test(vs: Vec<u16>, probe: u16) -> () {
            let mut t = OrderedBalancedTree::new();
            for &k in vs.iter() {
                t.insert_key(k);
            }
            let expected = t.keys().filter(|&&k| k < probe).count();
            assert_eq!(t.rank(&probe), expected);
            for (i, (k, _)) in t.iter().enumerate() {
                assert_eq!(t.get_index(i), Some((k, k)));
            }
        }
    }
}

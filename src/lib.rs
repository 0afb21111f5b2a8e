//! # Self-balancing ordered collections
//!
//! `ordered-balanced-tree` provides an ordered map,
//! [`OrderedBalancedTree`], and an ordered set, [`OrderedBalancedSet`], both
//! backed by AVL trees.  Lookups, insertions, and removals take O(log n)
//! comparisons, and the entries can be walked in key order at any time.
//!
//! Keys are ordered by a [`Compare`] implementation fixed when the collection
//! is created.  Types with an [`Ord`] implementation get [`Natural`] ordering
//! for free; any other order is a closure away:
//!
//! ```
//! use ordered_balanced_tree::OrderedBalancedTree;
//!
//! let mut t = OrderedBalancedTree::new();
//! t.insert(2, 'b').insert(1, 'a').insert(3, 'c');
//! assert_eq!(t.to_string(), "a | b | c");
//!
//! let mut by_len = OrderedBalancedTree::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
//! by_len.insert_key("three").insert_key("one").insert_key("four");
//! assert_eq!(by_len.to_string(), "one | four | three");
//! ```
//!
//! The collections are plain single-owner values.  They do no locking and
//! are meant to be mutated by one owner at a time.

mod avl;
pub use avl::Iter;
pub use avl::OrderedBalancedTree;
pub use avl::{OrderedBalancedSet, SetIter};

pub mod compare;
pub use compare::{Compare, Natural};

mod error;
pub use error::InvariantViolation;

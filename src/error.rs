use thiserror::Error;

/// A broken structural invariant, reported by `check()`.
///
/// A correctly functioning tree never produces one of these.  They exist so
/// tests (and suspicious callers using hand-written comparators) can verify a
/// tree without panicking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An in-order walk met a key that does not compare greater than its
    /// predecessor.
    #[error("keys out of order at in-order position {position}")]
    OutOfOrder { position: usize },

    /// A node's recorded height disagrees with its children.
    #[error("stale height at in-order position {position}: recorded {recorded}, actual {actual}")]
    StaleHeight {
        position: usize,
        recorded: i8,
        actual: i8,
    },

    /// The heights of a node's subtrees differ by more than one.
    #[error("unbalanced node at in-order position {position}: balance {balance}")]
    Unbalanced { position: usize, balance: i8 },

    /// A node's recorded subtree size disagrees with its children.
    #[error("stale subtree size at in-order position {position}: recorded {recorded}, actual {actual}")]
    StaleSize {
        position: usize,
        recorded: usize,
        actual: usize,
    },

    /// The tree's entry count disagrees with the number of nodes.
    #[error("entry count {recorded} does not match {actual} nodes")]
    LenMismatch { recorded: usize, actual: usize },
}

use thiserror::Error as ThisError;

/// Error enumerates over all possible invariant breakages that
/// [`Llrb::validate`][crate::Llrb::validate] can detect.
#[derive(Debug, PartialEq, ThisError)]
pub enum Error<K> {
    /// Fatal case, a red node has a red parent.
    #[error("consecutive reds")]
    ConsecutiveReds,
    /// Fatal case, a red link leans to the right.
    #[error("red link leaning right")]
    LeaningRight,
    /// Fatal case, root of the tree is red.
    #[error("red root")]
    RedRoot,
    /// Fatal case, black height differs between left and right child.
    /// The String component can be used for debugging.
    #[error("unbalanced blacks {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, key is not in sort-order with one of its ancestors,
    /// (key, ancestor-key).
    #[error("sort error key:{0:?} ancestor:{1:?}")]
    SortError(K, K),
}

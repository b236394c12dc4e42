use thiserror::Error;

/// Errors reported to callers of the ordered containers.
///
/// Every operation validates its arguments before touching the tree, so an
/// error always leaves the container unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// A positional access outside the valid range.
    #[error("position {pos} is out of range for length {len}")]
    InvalidPosition {
        /// Requested position
        pos: usize,
        /// Length of the container at the time of the call
        len: usize,
    },
    /// Dereferencing the end position, moving past either end, or using a
    /// cursor whose node has been erased.
    #[error("iterator access denied")]
    IteratorAccess,
}

/// Result alias used across the crate.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

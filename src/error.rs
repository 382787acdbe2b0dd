//! Error types.

use thiserror::Error;

/// Result type alias using [`TreeError`].
pub type Result<T> = std::result::Result<T, TreeError>;

/// Error kind returned by every fallible pool, tree, and persistence
/// operation.
///
/// The first failure aborts the remaining steps of the operation and is
/// returned verbatim; there is no retry and no rollback. A multi-step
/// operation that fails partway may leave the tree partially mutated (see the
/// crate-level documentation).
#[derive(Debug, Error)]
pub enum TreeError {
    /// The pool has no free slot left for an allocation.
    #[error("node pool exhausted")]
    PoolExhausted,

    /// A pool was requested with an unusable capacity.
    #[error("invalid pool capacity: {0}")]
    BadCapacity(usize),

    /// The ID does not address a live node of this tree.
    #[error("invalid or dead node id")]
    BadId,

    /// A child position is out of range for the node's child chain.
    #[error("child position out of range: {0}")]
    BadPos(usize),

    /// The payload codec rejected the input.
    #[error("malformed payload data")]
    BadData,

    /// A stored tree ended before all of its node blocks were closed.
    #[error("unterminated node block in stored tree")]
    BadRestoration,

    /// The underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

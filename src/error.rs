use thiserror::Error;

/// Result type alias for ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by ring operations.
///
/// Every failure is recoverable by the caller and leaves the ring exactly
/// as it was: a failed insert never splices a half-linked node, and a
/// failed remove never moves the sentinel's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The operation requires at least one element, but the ring is empty.
    #[error("ring is empty")]
    Empty,
    /// Storage for a node or its payload buffer could not be obtained.
    #[error("ring storage allocation failed")]
    Alloc,
}
